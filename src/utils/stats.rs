use num::Float;

/// Summary statistics of one row of scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowStats<N> {
    pub count: usize,
    pub mean: N,
    pub max: N,
    /// sample standard deviation (n - 1 denominator), `None` for fewer than two values
    pub sample_std: Option<N>,
}

impl<N> RowStats<N>
where
    N: Float,
{
    /// `None` for an empty slice
    pub fn from_slice(values: &[N]) -> Option<Self> {
        let (&first, rest) = values.split_first()?;
        let count = values.len();
        let n = N::from(count)?;

        let (sum, max) = rest
            .iter()
            .fold((first, first), |(sum, max), &v| (sum + v, max.max(v)));
        let mean = sum / n;

        let sample_std = if count < 2 {
            None
        } else {
            let sq_sum = values
                .iter()
                .fold(N::zero(), |acc, &v| acc + (v - mean) * (v - mean));
            Some((sq_sum / (n - N::one())).sqrt())
        };

        Some(Self {
            count,
            mean,
            max,
            sample_std,
        })
    }
}
