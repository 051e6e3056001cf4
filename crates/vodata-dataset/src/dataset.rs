use vodata_image::{stack_images, Image, ImageStack};
use vodata_pose::{assemble_pose, delta, io::read_poses_txt, OdometryDelta, RawPose};

use crate::{
    config::VoDatasetConfig,
    error::DatasetError,
    loader::{Identity, ImageLoader, ImageTransform},
    sequence_index::SequenceIndex,
};

/// One driving sequence: its identifier and one pose per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    id: String,
    poses: Vec<RawPose>,
}

impl Sequence {
    /// Create a sequence from already loaded poses.
    pub fn new(id: impl Into<String>, poses: Vec<RawPose>) -> Self {
        Self {
            id: id.into(),
            poses,
        }
    }

    /// The sequence identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The poses in frame order.
    pub fn poses(&self) -> &[RawPose] {
        &self.poses
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Whether the sequence has no frame.
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

/// Two consecutive frames, earlier frame first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePair<I> {
    /// `[frame, frame + 1]`.
    pub images: [I; 2],
}

impl<I> ImagePair<I> {
    /// The frame the motion starts from.
    pub fn earlier(&self) -> &I {
        &self.images[0]
    }

    /// The frame the motion ends at.
    pub fn later(&self) -> &I {
        &self.images[1]
    }
}

impl<T: Clone, const C: usize> ImagePair<Image<T, C>> {
    /// Stack both frames into a (2, H, W, C) block, earlier frame first.
    pub fn stack(&self) -> Result<ImageStack<T, C>, DatasetError> {
        Ok(stack_images(&self.images)?)
    }
}

/// A training sample: two consecutive frames and the motion between their poses.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<I> {
    /// The frames, earlier first.
    pub images: ImagePair<I>,
    /// `pose(frame + 1) - pose(frame)` as 6DoF vectors.
    pub odometry: OdometryDelta,
    /// Ordinal of the sequence the frames come from.
    pub sequence: usize,
    /// Local index of the earlier frame.
    pub frame: usize,
}

/// Dataset of consecutive frame pairs over several driving sequences.
///
/// All pose files are read when the dataset is built and never change afterwards.
/// Images are read on every [`VoDataset::get`] through the [`ImageLoader`], then passed
/// through the [`ImageTransform`]. The dataset is `Sync` when both collaborators are, so
/// it can be shared by several workers without locking.
///
/// # Example
///
/// ```no_run
/// use vodata_dataset::{PngImageLoader, SequenceSplit, VoDataset, VoDatasetConfig};
///
/// let config = VoDatasetConfig::from_split("/data/odometry", SequenceSplit::Train);
/// let dataset = VoDataset::new(config, PngImageLoader).unwrap();
///
/// let sample = dataset.get(0).unwrap();
/// let stack = sample.images.stack().unwrap();
/// assert_eq!(stack.len(), 2);
/// ```
pub struct VoDataset<L, T = Identity> {
    config: VoDatasetConfig,
    sequences: Vec<Sequence>,
    index: SequenceIndex,
    loader: L,
    transform: T,
}

impl<L: ImageLoader> VoDataset<L, Identity> {
    /// Load the pose files of every configured sequence and build the sample index.
    ///
    /// # Arguments
    ///
    /// * `config` - Data location and sequence selection.
    /// * `loader` - Reads the frames.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid, if any pose file cannot be read or holds a
    /// malformed record, or if a sequence has fewer than two frames. No partially loaded
    /// dataset is ever returned.
    pub fn new(config: VoDatasetConfig, loader: L) -> Result<Self, DatasetError> {
        config.validate()?;

        let sequences = config
            .sequences
            .iter()
            .map(|id| load_sequence(&config, id))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_sequences(config, sequences, loader)
    }

    /// Build the dataset from sequences loaded elsewhere.
    ///
    /// `config` only provides the image locations; its sequence list is replaced by the
    /// identifiers of `sequences`.
    ///
    /// # Errors
    ///
    /// Fails if the resulting configuration is invalid, e.g. `sequences` is empty, or if
    /// a sequence has fewer than two frames.
    pub fn from_sequences(
        mut config: VoDatasetConfig,
        sequences: Vec<Sequence>,
        loader: L,
    ) -> Result<Self, DatasetError> {
        config.sequences = sequences.iter().map(|s| s.id.clone()).collect();
        config.validate()?;

        sequences.iter().for_each(warn_invalid_rotations);

        let sizes = sequences.iter().map(Sequence::len).collect::<Vec<_>>();
        let index = SequenceIndex::build(&sizes)?;

        log::info!(
            "dataset ready: {} sequences, {} samples",
            sequences.len(),
            index.len()
        );

        Ok(Self {
            config,
            sequences,
            index,
            loader,
            transform: Identity,
        })
    }
}

impl<L, T> VoDataset<L, T>
where
    L: ImageLoader,
    T: ImageTransform<L::Image>,
{
    /// Replace the per-image transform.
    pub fn with_transform<U>(self, transform: U) -> VoDataset<L, U>
    where
        U: ImageTransform<L::Image>,
    {
        VoDataset {
            config: self.config,
            sequences: self.sequences,
            index: self.index,
            loader: self.loader,
            transform,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether there is no sample.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of loaded sequences.
    pub fn num_sequences(&self) -> usize {
        self.sequences.len()
    }

    /// The loaded sequences in configuration order.
    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    /// The sequence at `ordinal`, if any.
    pub fn sequence(&self, ordinal: usize) -> Option<&Sequence> {
        self.sequences.get(ordinal)
    }

    /// The sample index.
    pub fn index(&self) -> &SequenceIndex {
        &self.index
    }

    /// The configuration the dataset was built from.
    pub fn config(&self) -> &VoDatasetConfig {
        &self.config
    }

    /// Resolve a global sample index into `(sequence ordinal, frame)`.
    pub fn resolve(&self, index: usize) -> Result<(usize, usize), DatasetError> {
        Ok(self.index.resolve(index)?)
    }

    /// The odometry target of a sample, without reading any image.
    pub fn odometry(&self, index: usize) -> Result<OdometryDelta, DatasetError> {
        let (ordinal, frame) = self.resolve(index)?;
        Ok(self.odometry_at(ordinal, frame))
    }

    /// Fetch a sample: frames `frame` and `frame + 1` and the motion between them.
    ///
    /// # Errors
    ///
    /// [`DatasetError::Index`] when `index >= self.len()`, [`DatasetError::ImageLoadError`]
    /// when the loader fails on either frame.
    pub fn get(&self, index: usize) -> Result<Sample<L::Image>, DatasetError> {
        let (ordinal, frame) = self.resolve(index)?;
        let sequence = &self.sequences[ordinal];
        log::debug!(
            "sample {} -> sequence {} frame {}",
            index,
            sequence.id,
            frame
        );

        let image1 = self.load_image(&sequence.id, frame)?;
        let image2 = self.load_image(&sequence.id, frame + 1)?;

        let odometry = self.odometry_at(ordinal, frame);

        let images = ImagePair {
            images: [self.transform.apply(image1), self.transform.apply(image2)],
        };

        Ok(Sample {
            images,
            odometry,
            sequence: ordinal,
            frame,
        })
    }

    /// Iterate over all samples in index order.
    pub fn iter(&self) -> impl Iterator<Item = Result<Sample<L::Image>, DatasetError>> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    fn odometry_at(&self, ordinal: usize, frame: usize) -> OdometryDelta {
        let poses = &self.sequences[ordinal].poses;
        let pose1 = assemble_pose(&poses[frame]);
        let pose2 = assemble_pose(&poses[frame + 1]);
        delta(&pose1, &pose2)
    }

    fn load_image(&self, sequence: &str, frame: usize) -> Result<L::Image, DatasetError> {
        let path = self.config.image_path(sequence, frame);
        self.loader
            .load(&path)
            .map_err(|e| DatasetError::ImageLoadError {
                path,
                source: Box::new(e),
            })
    }
}

fn load_sequence(config: &VoDatasetConfig, id: &str) -> Result<Sequence, DatasetError> {
    let path = config.pose_path(id);
    let poses = read_poses_txt(&path).map_err(|source| DatasetError::PoseFile {
        path: path.clone(),
        source,
    })?;

    log::info!(
        "loaded sequence {} with {} poses from {}",
        id,
        poses.len(),
        path.display()
    );

    Ok(Sequence::new(id, poses))
}

fn warn_invalid_rotations(sequence: &Sequence) {
    let invalid = sequence
        .poses
        .iter()
        .filter(|p| !p.has_valid_rotation())
        .count();
    if invalid > 0 {
        log::warn!(
            "sequence {}: {} of {} poses do not hold a rotation matrix",
            sequence.id,
            invalid,
            sequence.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        path::{Path, PathBuf},
        sync::Mutex,
    };

    use approx::assert_relative_eq;
    use vodata_pose::euler;

    /// Serves a constant frame per path, tagged with the frame number.
    struct TaggingLoader {
        requests: Mutex<Vec<PathBuf>>,
    }

    impl TaggingLoader {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("no frame")]
    struct NoFrame;

    impl ImageLoader for TaggingLoader {
        type Image = Image<u8, 1>;
        type Error = NoFrame;

        fn load(&self, path: &Path) -> Result<Self::Image, Self::Error> {
            self.requests
                .lock()
                .map_err(|_| NoFrame)?
                .push(path.to_path_buf());
            let frame = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u8>().ok())
                .ok_or(NoFrame)?;
            Image::from_size_val([2, 2].into(), frame).map_err(|_| NoFrame)
        }
    }

    fn translation_sequence(id: &str, n: usize) -> Sequence {
        let poses = (0..n)
            .map(|i| RawPose::from_translation([i as f64, 0.0, 0.0]))
            .collect();
        Sequence::new(id, poses)
    }

    fn dataset(sequences: Vec<Sequence>) -> Result<VoDataset<TaggingLoader>, DatasetError> {
        let config = VoDatasetConfig::new("/data", vec![]);
        VoDataset::from_sequences(config, sequences, TaggingLoader::new())
    }

    #[test]
    fn test_len_and_resolve() -> Result<(), DatasetError> {
        let ds = dataset(vec![
            translation_sequence("00", 5),
            translation_sequence("01", 3),
        ])?;
        assert_eq!(ds.len(), 6);
        assert_eq!(ds.num_sequences(), 2);
        assert_eq!(ds.config().sequences, vec!["00", "01"]);
        assert_eq!(ds.resolve(4)?, (1, 0));

        Ok(())
    }

    #[test]
    fn test_get_loads_consecutive_frames() -> Result<(), DatasetError> {
        let ds = dataset(vec![
            translation_sequence("00", 5),
            translation_sequence("01", 3),
        ])?;

        let sample = ds.get(5)?;
        assert_eq!((sample.sequence, sample.frame), (1, 1));
        assert_eq!(sample.images.earlier().as_slice(), &[1, 1, 1, 1]);
        assert_eq!(sample.images.later().as_slice(), &[2, 2, 2, 2]);
        assert_eq!(
            sample.odometry,
            OdometryDelta([0.0, 0.0, 0.0, 1.0, 0.0, 0.0])
        );

        let requests = ds.loader.requests.lock().unwrap();
        assert_eq!(
            *requests,
            vec![
                PathBuf::from("/data/sequences/01/image_2/000001.png"),
                PathBuf::from("/data/sequences/01/image_2/000002.png"),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_get_out_of_range() -> Result<(), DatasetError> {
        let ds = dataset(vec![translation_sequence("00", 3)])?;
        assert!(matches!(
            ds.get(2),
            Err(DatasetError::Index(
                crate::SequenceIndexError::IndexOutOfRange { index: 2, len: 2 }
            ))
        ));
        assert!(ds.odometry(2).is_err());

        Ok(())
    }

    #[test]
    fn test_transform_applies_to_both_frames() -> Result<(), DatasetError> {
        let ds = dataset(vec![translation_sequence("00", 3)])?.with_transform(
            |mut image: Image<u8, 1>| {
                image.as_slice_mut().iter_mut().for_each(|v| *v += 10);
                image
            },
        );

        let sample = ds.get(0)?;
        assert_eq!(sample.images.earlier().as_slice(), &[10, 10, 10, 10]);
        assert_eq!(sample.images.later().as_slice(), &[11, 11, 11, 11]);

        let stack = sample.images.stack()?;
        assert_eq!(stack.shape(), [2, 2, 2, 1]);
        assert_eq!(stack.image_slice(0), Some(&[10u8, 10, 10, 10][..]));

        Ok(())
    }

    #[test]
    fn test_odometry_with_rotation() -> Result<(), DatasetError> {
        let r1 = euler::euler_to_rotation_matrix(&[0.01, 0.02, 0.03]);
        let r2 = euler::euler_to_rotation_matrix(&[0.02, 0.00, 0.05]);
        let sequence = Sequence::new(
            "07",
            vec![
                RawPose::from_rotation_translation(&r1, &[0.0, 0.0, 1.0]),
                RawPose::from_rotation_translation(&r2, &[0.5, 0.0, 2.0]),
            ],
        );
        let ds = dataset(vec![sequence])?;

        let odometry = ds.odometry(0)?;
        let expected = [0.01, -0.02, 0.02, 0.5, 0.0, 1.0];
        for (v, e) in odometry.as_array().iter().zip(expected.iter()) {
            assert_relative_eq!(v, e, epsilon = 1e-9);
        }

        Ok(())
    }

    #[test]
    fn test_iter_visits_every_sample() -> Result<(), DatasetError> {
        let ds = dataset(vec![
            translation_sequence("00", 3),
            translation_sequence("01", 2),
        ])?;
        let visited = ds
            .iter()
            .map(|s| s.map(|s| (s.sequence, s.frame)))
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(visited, vec![(0, 0), (0, 1), (1, 0)]);

        Ok(())
    }

    #[test]
    fn test_loader_error_is_propagated() -> Result<(), DatasetError> {
        // frame numbers above 255 do not fit the tag and make the loader fail
        let ds = dataset(vec![translation_sequence("00", 300)])?;
        match ds.get(255) {
            Err(DatasetError::ImageLoadError { path, source }) => {
                assert_eq!(path, PathBuf::from("/data/sequences/00/image_2/000256.png"));
                assert!(source.downcast_ref::<NoFrame>().is_some());
            }
            other => panic!("unexpected result: {:?}", other.map(|s| s.frame)),
        }

        Ok(())
    }

    #[test]
    fn test_short_sequence_aborts_construction() {
        let res = dataset(vec![
            translation_sequence("00", 3),
            translation_sequence("01", 1),
        ]);
        assert!(matches!(
            res,
            Err(DatasetError::Index(
                crate::SequenceIndexError::SequenceTooShort {
                    ordinal: 1,
                    size: 1
                }
            ))
        ));
    }

    #[test]
    fn test_from_sequences_validates_config() {
        let mut config = VoDatasetConfig::new("/data", vec![]);
        config.trajectory_length = 0;
        let res = VoDataset::from_sequences(
            config,
            vec![translation_sequence("00", 3)],
            TaggingLoader::new(),
        );
        assert!(matches!(res, Err(DatasetError::InvalidConfig(_))));

        let res = dataset(vec![]);
        assert!(matches!(res, Err(DatasetError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_sequences_keeps_invalid_rotations() -> Result<(), DatasetError> {
        let mut scaled = RawPose::from_translation([0.0; 3]);
        scaled.0[0] = 2.0;
        let sequence = Sequence::new(
            "00",
            vec![scaled, RawPose::from_translation([1.0; 3])],
        );
        assert!(!sequence.poses()[0].has_valid_rotation());

        let ds = dataset(vec![sequence])?;
        assert_eq!(ds.len(), 1);
        assert!(ds.odometry(0).is_ok());

        Ok(())
    }

    #[test]
    fn test_dataset_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VoDataset<crate::PngImageLoader>>();
    }
}
