//! Text rendering of the win probability table.

use fair_dice_core::{Die, ProbabilityTable};

/// Fixed-width table of the row die's chance to beat the column die
pub fn probability_table(dice: &[Die], table: &ProbabilityTable) -> String {
    let corner = "row die \\ col die";
    let labels: Vec<String> = dice.iter().map(Die::to_string).collect();
    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|p| match p {
                    Some(p) => format!("{:.2}%", p * 100.0),
                    None => "N/A".to_string(),
                })
                .collect()
        })
        .collect();

    let first_width = labels
        .iter()
        .map(String::len)
        .chain([corner.len()])
        .max()
        .unwrap_or(0);
    let widths: Vec<usize> = labels
        .iter()
        .enumerate()
        .map(|(j, label)| {
            cells
                .iter()
                .filter_map(|row| row.get(j))
                .map(String::len)
                .chain([label.len()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let rule = {
        let mut line = format!("+{}+", "-".repeat(first_width + 2));
        for w in &widths {
            line.push_str(&"-".repeat(w + 2));
            line.push('+');
        }
        line
    };
    let row_line = |first: &str, rest: &[String]| {
        let mut line = format!("| {first:<first_width$} |");
        for (value, w) in rest.iter().zip(widths.iter().copied()) {
            line.push_str(&format!(" {value:>w$} |"));
        }
        line
    };

    let mut out = vec![
        "Probability of the win for the row die:".to_string(),
        rule.clone(),
        row_line(corner, &labels),
        rule.clone(),
    ];
    for (label, row) in labels.iter().zip(&cells) {
        out.push(row_line(label, row));
    }
    out.push(rule);
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fair_dice_core::games::parse_dice;

    #[test]
    fn test_renders_all_cells() {
        let dice = parse_dice(["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"]).unwrap();
        let table = ProbabilityTable::compute(&dice);
        let text = probability_table(&dice, &table);

        assert_eq!(text.matches("N/A").count(), 3);
        assert_eq!(text.matches("55.56%").count(), 3);
        assert_eq!(text.matches("44.44%").count(), 3);
        assert!(text.contains("[6,8,1,1,8,6]"));
    }

    #[test]
    fn test_rows_are_aligned() {
        let dice = parse_dice(["1,2,3,4,5,6", "10,20,30,40,50,60"]).unwrap();
        let table = ProbabilityTable::compute(&dice);
        let text = probability_table(&dice, &table);

        let widths: Vec<usize> = text.lines().skip(1).map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{text}");
    }
}
