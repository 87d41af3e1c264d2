use crate::controller::Outcome;
use shared::geocell::Cell;
use std::fmt::Write;

/// Plain-text rendering of an [`Outcome`]. Empty results and failures read differently.
pub fn render(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Cells { cells, exported } => {
            let mut out = if cells.is_empty() {
                String::from("No cells matched.\n")
            } else {
                cell_table(cells)
            };
            if let Some(exported) = exported {
                let _ = writeln!(
                    out,
                    "Exported {} cells to {}",
                    exported.cells,
                    exported.path.display()
                );
            }
            out
        }
        Outcome::CsvExported {
            path,
            observations,
            cells,
        } => format!(
            "Exported {observations} observations covering {cells} known cells to {}\n",
            path.display()
        ),
        Outcome::Listing { title, items } => {
            let mut out = format!("{title} ({})\n", items.len());
            for item in items {
                let _ = writeln!(out, "  {item}");
            }
            out
        }
        Outcome::InvalidInput(e) => format!("Invalid input: {e}\n"),
        Outcome::InvalidArgument(message) => format!("Cannot run query: {message}\n"),
        Outcome::QueryFailed(e) => format!("Query failed: {e}\n"),
        Outcome::ExportFailed(message) => format!("Export failed: {message}\n"),
        Outcome::TaskFailed(message) => format!("Action aborted: {message}\n"),
    }
}

fn cell_table(cells: &[Cell]) -> String {
    let mut out = format!("{} cells\n", cells.len());
    for cell in cells {
        let coordinates = cell
            .point()
            .map_or_else(|| "-".to_string(), |p| format!("{:.5},{:.5}", p.y(), p.x()));
        let _ = write!(
            out,
            "{:<24} {:<6} {:<10} {:<8} {:>4}° {:<20} {}",
            cell.key().unwrap_or("-"),
            cell.technology.to_string(),
            cell.brand().unwrap_or("-"),
            cell.lac_tac,
            cell.direction,
            coordinates,
            cell.name,
        );
        if let Some(distance) = cell.distance_from_reference {
            let _ = write!(out, " ({distance:.0} m)");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Exported;
    use cell_query::QueryError;
    use chrono::NaiveDate;
    use shared::geocell::Technology;

    fn cell() -> Cell {
        Cell {
            id: 1,
            lac_tac: "8840".into(),
            ci: None,
            eci_nci: None,
            cgi: Some("268-06-8840-8453".into()),
            paragon_cgi: String::new(),
            technology: Technology::Nr,
            direction: 45,
            name: "Baixa".into(),
            created: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            modified: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            band: None,
            location: None,
            operator: None,
            distance_from_reference: Some(412.4),
        }
    }

    #[test]
    fn empty_results_differ_from_failures() {
        let empty = render(&Outcome::Cells {
            cells: Vec::new(),
            exported: None,
        });
        let failed = render(&Outcome::QueryFailed(QueryError::IllegalArgs("x".into())));
        assert_eq!(empty, "No cells matched.\n");
        assert!(failed.starts_with("Query failed:"));
    }

    #[test]
    fn cells_are_listed_one_per_line() {
        let text = render(&Outcome::Cells {
            cells: vec![cell(), cell()],
            exported: Some(Exported {
                path: "out.kmz".into(),
                cells: 1,
            }),
        });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "2 cells");
        assert!(lines[1].starts_with("268-06-8840-8453"));
        assert!(lines[1].contains("5G"));
        assert!(lines[1].ends_with("Baixa (412 m)"));
        assert_eq!(lines[3], "Exported 1 cells to out.kmz");
    }

    #[test]
    fn listings_show_count() {
        let text = render(&Outcome::Listing {
            title: "Bands",
            items: vec!["B20".into(), "B3".into()],
        });
        assert_eq!(text, "Bands (2)\n  B20\n  B3\n");
    }
}
