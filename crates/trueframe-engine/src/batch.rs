//! Batch accumulation for inference.

use crate::preprocess::FrameTensor;

/// Groups preprocessed frames into fixed-size batches.
///
/// Buffers tensors until the configured batch size is reached, then emits a
/// full batch. `flush` emits whatever remains as one final partial batch.
/// Every pushed tensor appears in exactly one emitted batch, in push order;
/// no batch is empty or larger than the batch size.
pub struct BatchAccumulator {
    buffer: Vec<FrameTensor>,
    batch_size: usize,
}

impl BatchAccumulator {
    /// Create an accumulator. Batch size must be positive.
    pub fn new(batch_size: usize) -> Self {
        debug_assert!(batch_size > 0, "batch size must be positive");
        Self {
            buffer: Vec::with_capacity(batch_size),
            batch_size: batch_size.max(1),
        }
    }

    /// Add a tensor; returns a full batch once `batch_size` are buffered.
    pub fn push(&mut self, tensor: FrameTensor) -> Option<Vec<FrameTensor>> {
        self.buffer.push(tensor);
        if self.buffer.len() == self.batch_size {
            Some(std::mem::replace(
                &mut self.buffer,
                Vec::with_capacity(self.batch_size),
            ))
        } else {
            None
        }
    }

    /// Emit the final partial batch, if any tensors remain buffered.
    pub fn flush(&mut self) -> Option<Vec<FrameTensor>> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }

    /// Number of tensors currently buffered.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor(tag: f32) -> FrameTensor {
        FrameTensor { data: vec![tag] }
    }

    fn collect_batches(count: usize, batch_size: usize) -> Vec<Vec<FrameTensor>> {
        let mut acc = BatchAccumulator::new(batch_size);
        let mut batches = Vec::new();
        for i in 0..count {
            if let Some(batch) = acc.push(tensor(i as f32)) {
                batches.push(batch);
            }
        }
        if let Some(batch) = acc.flush() {
            batches.push(batch);
        }
        batches
    }

    #[test]
    fn test_batch_count_is_ceil() {
        for (count, batch_size) in [(30usize, 16usize), (16, 16), (15, 16), (1, 16), (100, 7)] {
            let batches = collect_batches(count, batch_size);
            assert_eq!(batches.len(), count.div_ceil(batch_size));
        }
    }

    #[test]
    fn test_all_but_last_are_full_and_order_preserved() {
        let batches = collect_batches(30, 16);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 16);
        assert_eq!(batches[1].len(), 14);

        let flattened: Vec<f32> = batches
            .iter()
            .flatten()
            .map(|t| t.data[0])
            .collect();
        let expected: Vec<f32> = (0..30).map(|i| i as f32).collect();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn test_exact_multiple_has_no_partial_batch() {
        let batches = collect_batches(32, 16);
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.len() == 16));
    }

    #[test]
    fn test_empty_input_yields_no_batches() {
        let batches = collect_batches(0, 16);
        assert!(batches.is_empty());
    }

    #[test]
    fn test_flush_is_idempotent() {
        let mut acc = BatchAccumulator::new(4);
        acc.push(tensor(0.0));
        assert_eq!(acc.pending(), 1);
        assert_eq!(acc.flush().unwrap().len(), 1);
        assert!(acc.flush().is_none());
        assert_eq!(acc.pending(), 0);
    }
}
