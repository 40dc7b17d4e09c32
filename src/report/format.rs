//! Formatted terminal output for selection runs.
//!
//! Formatting code stays in one place so:
//! - the selection/estimation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::types::{LambdaInstability, Method, Selection};

/// Format the run summary: method, chosen strength, graph shape, and the
/// edge list.
pub fn format_selection_summary(selection: &Selection, method: Method) -> String {
    let d = selection.adjacency.nrows();
    let mut out = String::new();

    out.push_str("=== mrf-select - structure selection ===\n");
    out.push_str(&format!("Method: {}\n", method.display_name()));
    out.push_str(&format!("Lambda: {:.6}\n", selection.lambda));
    out.push_str(&format!(
        "Graph: d={} | edges={} | density={:.3}\n",
        d,
        selection.edge_count(),
        selection.density()
    ));

    out.push_str("\nEdges:\n");
    if selection.edge_count() == 0 {
        out.push_str("- (none)\n");
    } else {
        for i in 0..d {
            for j in (i + 1)..d {
                if selection.adjacency[(i, j)] {
                    out.push_str(&format!("- x{i} -- x{j}\n"));
                }
            }
        }
    }

    out
}

/// Format the scan's instability profile as an aligned two-column table,
/// strongest candidate first, marking the selected strength when it
/// appears among the evaluated candidates (a first-candidate violation
/// selects the weakest strength without ever measuring it, so the marker
/// can be legitimately absent).
pub fn format_instability_profile(profile: &[LambdaInstability], selected: f64) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>2} {:>12} {:>12}\n", "", "lambda", "instability"));
    out.push_str(&format!("{:>2} {:->12} {:->12}\n", "", "", ""));
    for point in profile {
        let marker = if point.lambda == selected { "*" } else { " " };
        out.push_str(&format!(
            "{marker:>2} {:>12.6} {:>12.6}\n",
            point.lambda, point.instability
        ));
    }
    out
}
