use crate::algo::GridOptions;
use crate::error::Result;
use crate::graph::{Graph, Handles, LayoutResult, Point};

/// Row-major fill into `ceil(sqrt(n))` columns, ignoring edges entirely.
pub fn layout(graph: &Graph, opts: &GridOptions) -> Result<LayoutResult> {
    opts.cell.validate()?;
    let nodes = graph.unique_nodes();
    if nodes.is_empty() {
        return Ok(LayoutResult::default());
    }

    let columns = ((nodes.len() as f64).sqrt().ceil() as usize).max(1);
    let positions: Vec<Point> = (0..nodes.len())
        .map(|i| {
            Point::new(
                (i % columns) as f64 * opts.cell.width,
                (i / columns) as f64 * opts.cell.height,
            )
        })
        .collect();
    Ok(LayoutResult::assemble(&nodes, &positions, Handles::VERTICAL))
}
