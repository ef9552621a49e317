//! `chunkwall plan`: run the layout engine without images.

use clap::Args;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::LayoutArgs;
use super::types::CommandContext;
use crate::cli::output::print_highlighted_json;
use crate::error::ChunkwallError;
use crate::layout::{CellMetrics, LayoutEngine, LayoutReport, Placement, ScreenSize};
use crate::platform::screen;

/// Arguments for `plan`.
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Number of placeholder images to place.
    #[arg(long, short = 'n', default_value_t = 60)]
    pub images: usize,

    /// Print the plan as JSON.
    #[arg(long, short)]
    pub json: bool,
}

/// A planned layout and the geometry it was computed for.
#[derive(Debug)]
pub struct Plan {
    pub resolution: ScreenSize,
    pub metrics: CellMetrics,
    pub report: LayoutReport,
}

/// Runs the engine over `args.images` unit items.
///
/// # Errors
///
/// Returns an error if the layout is invalid for the resolution.
pub fn build_plan(context: &CommandContext, args: &PlanArgs) -> Result<Plan, ChunkwallError> {
    let mode = context.mode(args.layout.mode);
    let provider = context.resolution_provider(args.layout.resolution);
    let resolution = screen::resolve(provider.as_ref(), context.fallback_resolution());

    let engine = LayoutEngine::new(context.layout(mode)?, resolution)?;
    let metrics = *engine.metrics();

    let mut rng = context.seed(args.layout.seed).map_or_else(
        || StdRng::from_rng(&mut rand::rng()),
        StdRng::seed_from_u64,
    );
    let report = engine.fill(mode, vec![(); args.images], &mut rng, |(), _| {});

    Ok(Plan { resolution, metrics, report })
}

/// Execute the plan command.
///
/// # Errors
///
/// Returns an error if the layout is invalid for the resolution.
pub fn execute(context: &CommandContext, args: &PlanArgs) -> Result<(), ChunkwallError> {
    let plan = build_plan(context, args)?;

    if args.json {
        print_highlighted_json(&plan_json(&plan, args.images));
        return Ok(());
    }

    let report = &plan.report;
    println!(
        "{} layout at {}, cells {}x{} px\n",
        report.mode, plan.resolution, plan.metrics.cell_width, plan.metrics.cell_height
    );
    print!("{}", report.grid);
    println!();

    if !report.placements.is_empty() {
        let mut table = Table::new(report.placements.iter().enumerate().map(PlacementRow::from));
        table.with(Style::rounded()).with(Modify::new(Columns::new(0..3)).with(Alignment::right()));
        println!("{table}\n");
    }

    println!(
        "Placed {} of {} items, {} attempts ({} skipped), {}/{} cells filled.",
        report.placed(),
        args.images,
        report.attempts,
        report.skipped,
        report.grid.occupied_count(),
        report.grid.total_cells(),
    );

    Ok(())
}

fn plan_json(plan: &Plan, requested: usize) -> serde_json::Value {
    let report = &plan.report;
    serde_json::json!({
        "mode": report.mode,
        "resolution": plan.resolution,
        "cell": plan.metrics,
        "requested": requested,
        "placed": report.placed(),
        "unplaced": report.unplaced,
        "attempts": report.attempts,
        "skipped": report.skipped,
        "filledCells": report.grid.occupied_count(),
        "totalCells": report.grid.total_cells(),
        "placements": report.placements,
    })
}

#[derive(Tabled)]
struct PlacementRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Row")]
    row: usize,
    #[tabled(rename = "Col")]
    col: usize,
    #[tabled(rename = "Shape")]
    shape: String,
    #[tabled(rename = "Rect")]
    rect: String,
}

impl From<(usize, &Placement)> for PlacementRow {
    fn from((index, placement): (usize, &Placement)) -> Self {
        Self {
            index: index + 1,
            row: placement.anchor.row,
            col: placement.anchor.col,
            shape: placement.shape.to_string(),
            rect: placement.rect.to_string(),
        }
    }
}
