use num::Float;

/// Vector comparison kernels over dense, index-aligned vectors.
pub trait Compare<N>
where
    N: Float,
{
    /// Dot product
    /// d(a, b) = Σ(a_i * b_i)
    fn dot(vec: &[N], other: &[N]) -> N;
    /// ||a|| = sqrt(Σ(a_i^2))
    fn norm(vec: &[N]) -> N;
    /// Cosine similarity
    /// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
    /// 0 when either side is a zero vector
    fn cosine_similarity(vec: &[N], other: &[N]) -> N {
        Self::cosine_with_norms(vec, Self::norm(vec), other, Self::norm(other))
    }
    /// cosine with norms computed beforehand
    fn cosine_with_norms(vec: &[N], vec_norm: N, other: &[N], other_norm: N) -> N {
        if vec_norm == N::zero() || other_norm == N::zero() {
            return N::zero();
        }
        let cos = Self::dot(vec, other) / (vec_norm * other_norm);
        // rounding can push identical directions slightly past 1
        cos.max(-N::one()).min(N::one())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCompare;

impl<N> Compare<N> for DefaultCompare
where
    N: Float,
{
    #[inline]
    fn dot(vec: &[N], other: &[N]) -> N {
        debug_assert_eq!(
            vec.len(),
            other.len(),
            "Vectors must be of the same length to compute dot product."
        );
        vec.iter()
            .zip(other)
            .fold(N::zero(), |acc, (&a, &b)| a.mul_add(b, acc))
    }

    #[inline]
    fn norm(vec: &[N]) -> N {
        vec.iter().fold(N::zero(), |acc, &a| a.mul_add(a, acc)).sqrt()
    }
}
