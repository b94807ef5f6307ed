use super::Tensor;
use std::ops::{Index, IndexMut};

// 引用式索引：`tensor[[n, h, w, c]]`
impl<const N: usize> Index<[usize; N]> for Tensor {
    type Output = f32;

    fn index(&self, indices: [usize; N]) -> &f32 {
        &self.data[&indices[..]]
    }
}

impl<const N: usize> IndexMut<[usize; N]> for Tensor {
    fn index_mut(&mut self, indices: [usize; N]) -> &mut f32 {
        &mut self.data[&indices[..]]
    }
}
