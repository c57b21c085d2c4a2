//! Log-stream rendering of comparison results and grids.

use benchlog::{Channel, LogStream, Logs};

use crate::compare::ComparisonResult;
use crate::grid::Grid;

/// Logs a comparison outcome: one info line on pass, one error line on fail.
pub fn report_comparison(logs: &mut Logs, label: &str, result: &ComparisonResult) {
    if result.passed() {
        logs.info()
            .write(label)
            .write(" : PASS, ")
            .write(result.elements)
            .write(" elements within tolerance ")
            .write(result.tolerance)
            .write(", max diff ")
            .write(result.max_diff)
            .end_line();
        return;
    }

    let channel = logs.error();
    channel
        .write(label)
        .write(" : FAIL, ")
        .write(result.divergent)
        .write(" of ")
        .write(result.elements)
        .write(" elements exceed tolerance ")
        .write(result.tolerance)
        .write(", max diff ")
        .write(result.max_diff);
    if let Some((row, col)) = result.first_divergence {
        channel
            .write(", first at (")
            .write(row)
            .write(", ")
            .write(col)
            .write(')');
    }
    channel.end_line();
}

/// Writes `grid` to `channel`, one line per row.
///
/// Returns without formatting anything when the channel is disabled, so a
/// null debug channel costs one branch regardless of grid size.
pub fn dump_grid(channel: &mut Channel, name: &str, grid: &Grid) {
    if !channel.is_enabled() {
        return;
    }

    channel
        .write(name)
        .write(" (")
        .write(grid.rows())
        .write('x')
        .write(grid.cols())
        .write(')')
        .end_line();
    for row in grid.row_iter() {
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                channel.write(' ');
            }
            channel.write(format_args!("{value:8.3}"));
        }
        channel.end_line();
    }
}
