use crate::solver::{ConvexSet, SetError};

//

/// Cartesian product of sets
/// 
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
/// 
/// \\[
/// \mathcal{C}_1 \times \cdots \times \mathcal{C}_k
/// \\]
/// Projection acts block by block.
pub struct SetCartesian
{
    sets: Vec<Box<dyn ConvexSet>>,
}

impl SetCartesian
{
    /// Creates an instance.
    /// 
    /// Returns [`SetCartesian`] instance.
    /// * `sets` are the member sets in order.
    pub fn new(sets: Vec<Box<dyn ConvexSet>>) -> Self
    {
        SetCartesian {
            sets
        }
    }

    pub fn num_sets(&self) -> usize
    {
        self.sets.len()
    }

    /// Dimension of each member set.
    pub fn dimensions(&self) -> Vec<Option<usize>>
    {
        self.sets.iter().map(|s| s.dimension()).collect()
    }

    /// Projects blocks onto the corresponding member sets.
    /// 
    /// Returns `Err` without touching any block if the number of blocks differs from the number of sets
    /// or a block length differs from a fixed member dimension.
    /// A nested [`SetCartesian`] member of unknown dimension is rejected the same way.
    /// * `blocks` are the vectors before entry, the projections on exit.
    pub fn proj_blocks(&mut self, blocks: &mut [&mut [f64]]) -> Result<(), SetError>
    {
        if blocks.len() != self.sets.len() {
            log::error!("SetCartesian: {} sets but {} blocks", self.sets.len(), blocks.len());
            return Err(SetError::BlockCountMismatch);
        }

        for (i, (s, b)) in self.sets.iter_mut().zip(blocks.iter()).enumerate() {
            match s.dimension() {
                Some(d) if d != b.len() => {
                    log::error!("SetCartesian: set #{} dimension {} but block length {}", i, d, b.len());
                    return Err(SetError::DimensionMismatch);
                },
                None if s.as_cartesian_mut().is_some() => {
                    log::error!("SetCartesian: nested set #{} must have fixed member dimensions", i);
                    return Err(SetError::UnknownDimension);
                },
                _ => {},
            }
        }

        for (s, b) in self.sets.iter_mut().zip(blocks.iter_mut()) {
            s.proj(b)?;
        }
        Ok(())
    }
}

impl ConvexSet for SetCartesian
{
    fn dimension(&self) -> Option<usize>
    {
        self.sets.iter().map(|s| s.dimension()).sum()
    }

    fn proj(&mut self, x: &mut [f64]) -> Result<(), SetError>
    {
        let dims: Option<Vec<usize>> = self.sets.iter().map(|s| s.dimension()).collect();
        let dims = dims.ok_or_else(|| {
            log::error!("SetCartesian: member dimensions must be fixed to project a flat vector");
            SetError::UnknownDimension
        })?;

        let total: usize = dims.iter().sum();
        if total != x.len() {
            log::error!("SetCartesian: dimension {} but vector length {}", total, x.len());
            return Err(SetError::DimensionMismatch);
        }

        let mut blocks = Vec::with_capacity(dims.len());
        let mut rest = x;
        for d in dims {
            let (b, r) = core::mem::take(&mut rest).split_at_mut(d);
            blocks.push(b);
            rest = r;
        }

        self.proj_blocks(&mut blocks)
    }

    fn as_cartesian_mut(&mut self) -> Option<&mut SetCartesian>
    {
        Some(self)
    }
}

//

#[test]
fn test_set_cartesian1()
{
    use crate::SetBox;

    let mut c = SetCartesian::new(vec![
        Box::new(SetBox::new(-2., 2.)),
        Box::new(SetBox::new(-2., 2.)),
    ]);
    assert_eq!(c.dimension(), None);

    let b0: &mut [f64] = &mut [3., -3.];
    let b1: &mut [f64] = &mut [0., 0.];
    c.proj_blocks(&mut [&mut *b0, &mut *b1]).unwrap();
    assert_eq!(b0, &[2., -2.]);
    assert_eq!(b1, &[0., 0.]);
    assert_eq!(c.dimension(), Some(4));

    let x = &mut [5., 0., -1., -5.];
    c.proj(x).unwrap();
    assert_eq!(x, &[2., 0., -1., -2.]);
}

#[test]
fn test_set_cartesian2()
{
    use crate::{ConeRPos, ConeZero};

    let mut c = SetCartesian::new(vec![
        Box::new(ConeRPos::new().with_dim(2)),
        Box::new(ConeZero::new().with_dim(1)),
    ]);

    // wrong block count
    let b0: &mut [f64] = &mut [-1., -1.];
    assert_eq!(c.proj_blocks(&mut [&mut *b0]), Err(SetError::BlockCountMismatch));

    // second block mismatches, first block stays untouched
    let b1: &mut [f64] = &mut [1., 1.];
    assert_eq!(c.proj_blocks(&mut [&mut *b0, &mut *b1]), Err(SetError::DimensionMismatch));
    assert_eq!(b0, &[-1., -1.]);

    assert_eq!(c.proj(&mut [0.; 4]), Err(SetError::DimensionMismatch));
}

#[test]
fn test_set_cartesian3()
{
    use crate::ConeRPos;

    let mut c = SetCartesian::new(vec![
        Box::new(ConeRPos::new()),
    ]);
    assert_eq!(c.proj(&mut [0.; 2]), Err(SetError::UnknownDimension));
}

#[test]
fn test_set_cartesian4()
{
    use crate::SetBox;

    let inner = SetCartesian::new(vec![
        Box::new(SetBox::new(-1., 1.)),
    ]);
    let mut c = SetCartesian::new(vec![
        Box::new(SetBox::new(-1., 1.)),
        Box::new(inner),
    ]);

    // nested product of unknown dimension, first block stays untouched
    let b0: &mut [f64] = &mut [3., -3.];
    let b1: &mut [f64] = &mut [2.];
    assert_eq!(c.proj_blocks(&mut [&mut *b0, &mut *b1]), Err(SetError::UnknownDimension));
    assert_eq!(b0, &[3., -3.]);
    assert_eq!(c.dimension(), None);
}
