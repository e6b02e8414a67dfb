use clap::{Parser, ValueEnum};
use crossterm::event::{Event, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use indoc::indoc;
use ratatui::layout::{Direction, Rect};

use sheet_wm::config::UiConfig;
use sheet_wm::dock::Docksection;
use sheet_wm::input::MouseRouter;
use sheet_wm::sheet::{Sheet, TreeDump, WidgetId, WidgetKind};
use sheet_wm::window::{WindowBuilder, WindowState};
use sheet_wm::{Result, Ui};

const DOCK_COLUMN_WIDTH: u16 = 320;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    Dock,
    Popup,
    Grid,
}

#[derive(Parser, Debug)]
#[command(
    name = "sheet-wm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scripted walkthroughs of the widget sheet and window core",
    after_help = indoc! {"
        Each scenario builds a sheet, feeds it a scripted sequence of mouse
        events and prints the resulting widget tree and window geometry.

          dock   drag a window onto a dock column and back out
          popup  open a modal popup and dismiss it with a click
          grid   drag the boundary between two grid columns
    "}
)]
struct Cli {
    /// Width of the root sheet.
    #[arg(long, default_value_t = 1280)]
    width: u16,

    /// Height of the root sheet.
    #[arg(long, default_value_t = 720)]
    height: u16,

    #[arg(short, long, value_enum, default_value_t = Scenario::Dock)]
    scenario: Scenario,

    /// Log window, dock and modal transitions to stderr.
    #[arg(short, long)]
    verbose: bool,
}

/// Stacks docked windows top to bottom inside a fixed-width column.
struct ColumnDock {
    column: WidgetId,
    windows: Vec<WidgetId>,
}

impl ColumnDock {
    fn new(column: WidgetId) -> Self {
        Self {
            column,
            windows: Vec::new(),
        }
    }

    fn restack(&self, sheet: &mut Sheet) {
        let mut y = 0;
        for &window in &self.windows {
            let Ok(frame) = sheet.frame_mut(window) else {
                continue;
            };
            let (_, height) = frame.size();
            frame.set_position(0, y);
            frame.set_size(i32::from(DOCK_COLUMN_WIDTH), height);
            y += height;
        }
    }
}

impl Docksection for ColumnDock {
    fn dock(&mut self, sheet: &mut Sheet, window: WidgetId) {
        if let Err(err) = sheet.reparent(window, self.column) {
            tracing::warn!(window = ?window, error = %err, "column refused window");
            return;
        }
        self.windows.push(window);
        self.restack(sheet);
    }

    fn undock(&mut self, sheet: &mut Sheet, window: WidgetId) {
        self.windows.retain(|docked| *docked != window);
        let root = sheet.root();
        if let Err(err) = sheet.reparent(window, root) {
            tracing::warn!(window = ?window, error = %err, "failed to return window to root");
        }
        self.restack(sheet);
    }
}

fn mouse(kind: MouseEventKind, x: i32, y: i32) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column: x.clamp(0, i32::from(u16::MAX)) as u16,
        row: y.clamp(0, i32::from(u16::MAX)) as u16,
        modifiers: KeyModifiers::NONE,
    })
}

/// Presses at `from`, drags to `to` in two steps and releases.
fn drag(router: &mut MouseRouter, ui: &mut Ui, from: (i32, i32), to: (i32, i32)) {
    let middle = ((from.0 + to.0) / 2, (from.1 + to.1) / 2);
    let script = [
        mouse(MouseEventKind::Down(MouseButton::Left), from.0, from.1),
        mouse(MouseEventKind::Drag(MouseButton::Left), middle.0, middle.1),
        mouse(MouseEventKind::Drag(MouseButton::Left), to.0, to.1),
        mouse(MouseEventKind::Up(MouseButton::Left), to.0, to.1),
    ];
    for event in &script {
        router.handle(ui, event);
    }
}

fn print_tree(ui: &Ui) -> Result<()> {
    print!("{}", TreeDump::dump(ui.sheet(), ui.root())?);
    Ok(())
}

fn print_window(ui: &Ui, window: WidgetId, screen: Rect) -> Result<()> {
    let rect = ui.sheet().absolute_rect(window)?;
    println!(
        "{:?} at ({}, {}) {}x{}, visible {:?}, docked: {}",
        ui.window_name(window)?,
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        rect.visible_in(screen),
        ui.window_dock(window)?.is_some()
    );
    Ok(())
}

fn run_dock(ui: &mut Ui, screen: Rect) -> Result<()> {
    let root = ui.root();
    let column = ui.sheet_mut().spawn(root, WidgetKind::Container)?;
    ui.sheet_mut()
        .frame_mut(column)?
        .set_size(i32::from(DOCK_COLUMN_WIDTH), i32::from(screen.height));
    ui.add_docksection(column, ColumnDock::new(column))?;

    let state = WindowState {
        dockable: true,
        ..WindowState::default()
    };
    let window = ui.open_window(root, WindowBuilder::new("Tools").state(state).size(400, 300))?;
    print_window(ui, window, screen)?;

    let mut router = MouseRouter::new();
    let header = ui.sheet().absolute_rect(ui.window_parts(window)?.header)?;
    let grab = (header.x + 10, header.y + 5);
    drag(&mut router, ui, grab, (100, 100));
    print_window(ui, window, screen)?;
    print_tree(ui)?;

    let header = ui.sheet().absolute_rect(ui.window_parts(window)?.header)?;
    let grab = (header.x + 10, header.y + 5);
    drag(&mut router, ui, grab, (grab.0 + 600, grab.1 + 150));
    print_window(ui, window, screen)?;
    Ok(())
}

fn run_popup(ui: &mut Ui) -> Result<()> {
    let mut router = MouseRouter::new();
    let root = ui.root();
    ui.set_pointer(200, 120);
    let popup = ui.open_popup(root)?;
    println!("modal holder: {:?}", ui.modal_holder());
    print_tree(ui)?;

    router.handle(ui, &mouse(MouseEventKind::Down(MouseButton::Right), 5, 5));
    println!(
        "after click: popup alive = {}, modal holder = {:?}",
        ui.sheet().contains(popup),
        ui.modal_holder()
    );
    Ok(())
}

fn run_grid(ui: &mut Ui, screen: Rect) -> Result<()> {
    let root = ui.root();
    let grid = ui.sheet_mut().spawn(
        root,
        WidgetKind::GridSheet {
            dim: Direction::Horizontal,
        },
    )?;
    let column_width = i32::from(screen.width) / 3;
    ui.sheet_mut()
        .frame_mut(grid)?
        .set_size(column_width * 3, i32::from(screen.height));
    let mut columns = Vec::new();
    for i in 0..3 {
        let column = ui
            .sheet_mut()
            .container_mut(grid)?
            .emplace(WidgetKind::Container)?;
        let frame = ui.sheet_mut().frame_mut(column)?;
        frame.set_position(column_width * i, 0);
        frame.set_size(column_width, i32::from(screen.height));
        columns.push(column);
    }
    ui.sheet_mut().on_grid_resized(grid, |sheet, _, prev, next| {
        let width = |id| sheet.frame(id).map(|f| f.size().0).unwrap_or_default();
        tracing::info!(prev = width(prev), next = width(next), "grid resized");
    })?;

    let mut router = MouseRouter::new();
    drag(&mut router, ui, (column_width - 1, 10), (column_width + 80, 10));
    for column in columns {
        let rect = ui.sheet().frame(column)?.rect();
        println!("column at x={} width={}", rect.x, rect.width);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    sheet_wm::tracing_sub::init_default(cli.verbose);

    let mut ui = Ui::with_config(cli.width, cli.height, UiConfig::default());
    let screen = Rect::new(0, 0, cli.width, cli.height);
    match cli.scenario {
        Scenario::Dock => run_dock(&mut ui, screen),
        Scenario::Popup => run_popup(&mut ui),
        Scenario::Grid => run_grid(&mut ui, screen),
    }
}
