// crates/fcmtune-core/src/series.rs

use serde::Serialize;

/// One scored symbol: its position and its code length in bits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScorePoint {
    pub position: u64,
    pub bits: f64,
}

/// Per-position code lengths for one configuration, in scorer output order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScoreSeries {
    pub points: Vec<ScorePoint>,
}

impl ScoreSeries {
    pub fn new(points: Vec<ScorePoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Arithmetic mean of the code lengths; `None` for an empty series.
    pub fn mean_bits(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let sum: f64 = self.points.iter().map(|p| p.bits).sum();
        Some(sum / (self.points.len() as f64))
    }

    pub fn total_bits(&self) -> f64 {
        self.points.iter().map(|p| p.bits).sum()
    }

    pub fn bits(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.bits)
    }
}

impl FromIterator<ScorePoint> for ScoreSeries {
    fn from_iter<I: IntoIterator<Item = ScorePoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Parse one scorer line `<position> <bits> <symbol>`.
///
/// Exactly three whitespace-separated tokens; position must be an unsigned
/// integer and bits a finite non-negative number, both written without a
/// sign. The symbol token is not interpreted.
pub fn parse_line(line: &str) -> Option<ScorePoint> {
    let mut it = line.split_whitespace();
    let pos = it.next()?;
    let bits = it.next()?;
    let _sym = it.next()?;
    if it.next().is_some() {
        return None;
    }

    if [pos, bits].iter().any(|t| t.starts_with(['+', '-'])) {
        return None;
    }

    let position: u64 = pos.parse().ok()?;
    let bits: f64 = bits.parse().ok()?;
    if !bits.is_finite() || bits < 0.0 {
        return None;
    }
    Some(ScorePoint { position, bits })
}

/// Collect every data line of a scorer's stdout; other lines are dropped.
pub fn parse_output(text: &str) -> ScoreSeries {
    text.lines().filter_map(parse_line).collect()
}

/// Trailing moving average over `window` points (shorter at the start).
///
/// `window == 0` is treated as 1.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut acc = 0.0;
    for (i, &v) in values.iter().enumerate() {
        acc += v;
        if i >= window {
            acc -= values[i - window];
        }
        let n = (i + 1).min(window);
        out.push(acc / (n as f64));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_token_rows() {
        assert_eq!(
            parse_line("12 1.5 A"),
            Some(ScorePoint { position: 12, bits: 1.5 })
        );
        assert_eq!(
            parse_line("  3\t0.25   g "),
            Some(ScorePoint { position: 3, bits: 0.25 })
        );
    }

    #[test]
    fn rejects_malformed_rows() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("12 1.5"), None);
        assert_eq!(parse_line("12 1.5 A extra"), None);
        assert_eq!(parse_line("x 1.5 A"), None);
        assert_eq!(parse_line("-1 1.5 A"), None);
        assert_eq!(parse_line("12 abc A"), None);
        assert_eq!(parse_line("12 NaN A"), None);
        assert_eq!(parse_line("12 inf A"), None);
        assert_eq!(parse_line("12 -0.5 A"), None);
        assert_eq!(parse_line("12 -0.0 A"), None);
        assert_eq!(parse_line("+3 1.5 A"), None);
        assert_eq!(parse_line("3 +1.5 A"), None);
        assert_eq!(parse_line("Bits per symbol: 1.93"), None);
    }

    #[test]
    fn parse_output_skips_diagnostics() {
        let text = "loading model\n0 2.0 A\n1 1.0 C\nsummary: done\n2 3.0 G\n";
        let s = parse_output(text);
        assert_eq!(s.len(), 3);
        assert_eq!(s.mean_bits(), Some(2.0));
        assert_eq!(s.points[2].position, 2);
    }

    #[test]
    fn empty_series_has_no_mean() {
        assert_eq!(ScoreSeries::default().mean_bits(), None);
        assert_eq!(parse_output("nothing here\n").mean_bits(), None);
    }

    #[test]
    fn moving_average_ramps_up_then_slides() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let m = moving_average(&v, 3);
        assert_eq!(m, vec![1.0, 1.5, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(moving_average(&v, 0), v.to_vec());
        assert!(moving_average(&[], 5).is_empty());
    }
}
