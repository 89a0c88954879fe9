//! Frame sampling from a decoded video stream.
//!
//! `VideoFrameSource` wraps OpenCV's `VideoCapture`; `FrameSampler` drains any
//! `FrameSource` and yields one frame every `stride` decoded frames. The
//! sequence is lazy, finite, and non-restartable; restarting requires
//! reopening the source.

use tracing::warn;

use crate::error::{EngineError, EngineResult};

/// One decoded video frame in packed RGB8 layout.
#[derive(Debug, Clone)]
pub struct RgbFrame {
    pub width: u32,
    pub height: u32,
    /// `width * height * 3` bytes, row-major RGB
    pub data: Vec<u8>,
}

/// A frame selected by the sampler, tagged with its 0-based decode index.
#[derive(Debug, Clone)]
pub struct SampledFrame {
    pub index: u64,
    pub frame: RgbFrame,
}

/// Sequential access to decoded frames of one video resource.
///
/// Implementations own the decoding handle for the duration of one analysis
/// and must release it when dropped, however iteration ends.
pub trait FrameSource {
    /// Decode the next frame in stream order. `Ok(None)` at end of stream.
    fn next_frame(&mut self) -> EngineResult<Option<RgbFrame>>;
}

/// Stride-based frame sampler over any `FrameSource`.
///
/// Emits exactly the frames whose decode index satisfies
/// `index % stride == 0`. A mid-stream decode failure ends the sequence at
/// that point rather than failing the request; frames already collected
/// remain valid.
pub struct FrameSampler<S> {
    source: S,
    stride: u64,
    next_index: u64,
    done: bool,
}

impl<S: FrameSource> FrameSampler<S> {
    /// Create a sampler with the given stride. Stride must be positive.
    pub fn new(source: S, stride: u32) -> Self {
        debug_assert!(stride > 0, "frame stride must be positive");
        Self {
            source,
            stride: u64::from(stride.max(1)),
            next_index: 0,
            done: false,
        }
    }

    /// Total number of frames decoded so far (sampled or skipped).
    pub fn frames_decoded(&self) -> u64 {
        self.next_index
    }
}

impl<S: FrameSource> Iterator for FrameSampler<S> {
    type Item = SampledFrame;

    fn next(&mut self) -> Option<SampledFrame> {
        if self.done {
            return None;
        }
        loop {
            match self.source.next_frame() {
                Ok(Some(frame)) => {
                    let index = self.next_index;
                    self.next_index += 1;
                    if index % self.stride == 0 {
                        return Some(SampledFrame { index, frame });
                    }
                }
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    // A corrupt frame ends sampling; it does not fail the request.
                    warn!(frame_index = self.next_index, error = %e, "Frame decode failed, ending sample sequence");
                    self.done = true;
                    return None;
                }
            }
        }
    }
}

/// Video frame source backed by OpenCV `VideoCapture`.
#[cfg(feature = "opencv")]
pub struct VideoFrameSource {
    cap: opencv::videoio::VideoCapture,
}

#[cfg(feature = "opencv")]
impl VideoFrameSource {
    /// Open a video file for sequential decoding.
    ///
    /// Fails with `VideoOpen` if the container cannot be opened; this is
    /// terminal for the request.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> EngineResult<Self> {
        use opencv::prelude::VideoCaptureTraitConst;
        use opencv::videoio::{VideoCapture, CAP_ANY};

        let path = path.as_ref();
        let path_str = path.to_str().ok_or(EngineError::VideoOpen)?;

        let cap = VideoCapture::from_file(path_str, CAP_ANY).map_err(|e| {
            warn!(path = %path.display(), error = %e, "VideoCapture creation failed");
            EngineError::VideoOpen
        })?;

        if !cap.is_opened().unwrap_or(false) {
            return Err(EngineError::VideoOpen);
        }

        Ok(Self { cap })
    }
}

#[cfg(feature = "opencv")]
impl FrameSource for VideoFrameSource {
    fn next_frame(&mut self) -> EngineResult<Option<RgbFrame>> {
        use opencv::core::Mat;
        use opencv::imgproc;
        use opencv::prelude::{MatTraitConst, VideoCaptureTrait};

        let mut bgr = Mat::default();
        let ok = self
            .cap
            .read(&mut bgr)
            .map_err(|e| EngineError::internal(format!("Frame read failed: {}", e)))?;

        if !ok || bgr.empty() {
            return Ok(None);
        }

        // OpenCV decodes to BGR; the classifier expects RGB.
        let mut rgb = Mat::default();
        imgproc::cvt_color_def(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB)
            .map_err(|e| EngineError::internal(format!("Color conversion failed: {}", e)))?;

        let width = rgb.cols() as u32;
        let height = rgb.rows() as u32;
        let data = rgb
            .data_bytes()
            .map_err(|e| EngineError::internal(format!("Frame buffer access failed: {}", e)))?
            .to_vec();

        Ok(Some(RgbFrame {
            width,
            height,
            data,
        }))
    }
}

#[cfg(feature = "opencv")]
impl Drop for VideoFrameSource {
    fn drop(&mut self) {
        use opencv::prelude::VideoCaptureTrait;
        let _ = self.cap.release();
    }
}

/// Stub for when OpenCV is not available.
#[cfg(not(feature = "opencv"))]
pub struct VideoFrameSource;

#[cfg(not(feature = "opencv"))]
impl VideoFrameSource {
    pub fn open<P: AsRef<std::path::Path>>(_path: P) -> EngineResult<Self> {
        Err(EngineError::internal("OpenCV feature not enabled"))
    }
}

#[cfg(not(feature = "opencv"))]
impl FrameSource for VideoFrameSource {
    fn next_frame(&mut self) -> EngineResult<Option<RgbFrame>> {
        Err(EngineError::internal("OpenCV feature not enabled"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_frame() -> RgbFrame {
        RgbFrame {
            width: 2,
            height: 2,
            data: vec![0; 2 * 2 * 3],
        }
    }

    /// Yields `total` frames, optionally failing at a given index.
    struct SyntheticSource {
        total: u64,
        emitted: u64,
        fail_at: Option<u64>,
    }

    impl SyntheticSource {
        fn new(total: u64) -> Self {
            Self {
                total,
                emitted: 0,
                fail_at: None,
            }
        }

        fn failing_at(total: u64, fail_at: u64) -> Self {
            Self {
                total,
                emitted: 0,
                fail_at: Some(fail_at),
            }
        }
    }

    impl FrameSource for SyntheticSource {
        fn next_frame(&mut self) -> EngineResult<Option<RgbFrame>> {
            if Some(self.emitted) == self.fail_at {
                return Err(EngineError::internal("synthetic decode failure"));
            }
            if self.emitted >= self.total {
                return Ok(None);
            }
            self.emitted += 1;
            Ok(Some(test_frame()))
        }
    }

    #[test]
    fn test_sampled_index_set() {
        // For stride S and F decoded frames, indices are {0, S, 2S, ...} ∩ [0, F)
        for (frames, stride) in [(900u64, 30u32), (10, 3), (7, 1), (5, 10), (0, 30)] {
            let sampler = FrameSampler::new(SyntheticSource::new(frames), stride);
            let indices: Vec<u64> = sampler.map(|s| s.index).collect();
            let expected: Vec<u64> = (0..frames).step_by(stride as usize).collect();
            assert_eq!(indices, expected, "frames={} stride={}", frames, stride);
        }
    }

    #[test]
    fn test_stride_30_of_900_yields_30_frames() {
        let sampler = FrameSampler::new(SyntheticSource::new(900), 30);
        assert_eq!(sampler.count(), 30);
    }

    #[test]
    fn test_empty_source_yields_nothing() {
        let mut sampler = FrameSampler::new(SyntheticSource::new(0), 30);
        assert!(sampler.next().is_none());
        // Exhausted samplers stay exhausted
        assert!(sampler.next().is_none());
    }

    #[test]
    fn test_decode_failure_treated_as_end_of_stream() {
        // Failure at decode index 5: frames 0 and 3 were already sampled
        let sampler = FrameSampler::new(SyntheticSource::failing_at(100, 5), 3);
        let indices: Vec<u64> = sampler.map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 3]);
    }

    #[test]
    fn test_decode_failure_on_first_frame_yields_nothing() {
        let sampler = FrameSampler::new(SyntheticSource::failing_at(100, 0), 3);
        assert_eq!(sampler.count(), 0);
    }
}
