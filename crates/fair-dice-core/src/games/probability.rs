//! Pairwise win probabilities.

use super::Die;

/// Probability that `a` rolls strictly higher than `b`
pub fn win_probability(a: &Die, b: &Die) -> f64 {
    let wins = a
        .faces()
        .iter()
        .flat_map(|x| b.faces().iter().filter(move |y| x > y))
        .count();
    wins as f64 / (a.faces().len() * b.faces().len()) as f64
}

/// Row die's chance of beating the column die; `None` on the diagonal
#[derive(Clone, Debug, PartialEq)]
pub struct ProbabilityTable {
    cells: Vec<Vec<Option<f64>>>,
}

impl ProbabilityTable {
    pub fn compute(dice: &[Die]) -> Self {
        let cells = dice
            .iter()
            .enumerate()
            .map(|(i, a)| {
                dice.iter()
                    .enumerate()
                    .map(|(j, b)| (i != j).then(|| win_probability(a, b)))
                    .collect()
            })
            .collect();
        Self { cells }
    }

    /// Number of dice
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.cells
    }

    /// Die with the highest mean chance against the others (first on ties)
    pub fn strongest(&self) -> usize {
        let mean = |row: &Vec<Option<f64>>| {
            let known: Vec<f64> = row.iter().flatten().copied().collect();
            if known.is_empty() {
                0.0
            } else {
                known.iter().sum::<f64>() / known.len() as f64
            }
        };
        self.cells
            .iter()
            .enumerate()
            .map(|(i, row)| (i, mean(row)))
            .max_by(|a, b| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)))
            .map_or(0, |(i, _)| i)
    }

    /// Die most likely to beat `against`, skipping `excluding` (first on ties)
    pub fn best_counter(&self, against: usize, excluding: &[usize]) -> Option<usize> {
        (0..self.len())
            .filter(|&i| i != against && !excluding.contains(&i))
            .filter_map(|i| self.get(i, against).map(|p| (i, p)))
            .max_by(|a, b| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::parse_dice;

    fn intransitive() -> Vec<Die> {
        parse_dice(["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"]).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_win_probability_exact() {
        let dice = intransitive();

        assert!(close(win_probability(&dice[0], &dice[1]), 5.0 / 9.0));
        assert!(close(win_probability(&dice[1], &dice[0]), 4.0 / 9.0));
        assert!(close(win_probability(&dice[0], &dice[0]), 1.0 / 3.0));
    }

    #[test]
    fn test_table_diagonal_is_empty() {
        let table = ProbabilityTable::compute(&intransitive());

        assert_eq!(table.len(), 3);
        for i in 0..3 {
            assert_eq!(table.get(i, i), None);
        }
        assert!(close(table.get(2, 0).unwrap(), 5.0 / 9.0));
        assert_eq!(table.get(3, 0), None);
    }

    #[test]
    fn test_best_counter_in_cycle() {
        let table = ProbabilityTable::compute(&intransitive());

        assert_eq!(table.best_counter(0, &[]), Some(2));
        assert_eq!(table.best_counter(1, &[]), Some(0));
        assert_eq!(table.best_counter(2, &[]), Some(1));
        assert_eq!(table.best_counter(0, &[2]), Some(1));
        assert_eq!(table.best_counter(0, &[1, 2]), None);
    }

    #[test]
    fn test_strongest() {
        let dice = parse_dice(["1,1,1,1,1,1", "6,6,6,6,6,6", "3,3,3,3,3,3"]).unwrap();
        let table = ProbabilityTable::compute(&dice);

        assert_eq!(table.strongest(), 1);
    }

    #[test]
    fn test_strongest_tie_picks_first() {
        let table = ProbabilityTable::compute(&intransitive());
        assert_eq!(table.strongest(), 0);
    }
}
