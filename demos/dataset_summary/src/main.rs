use argh::FromArgs;
use std::path::PathBuf;

use vodata::dataset::{PngImageLoader, SequenceSplit, VoDataset, VoDatasetConfig};
use vodata::io::png::write_image_png_rgb8;

#[derive(FromArgs)]
/// Load a visual odometry dataset and print a summary of its samples.
struct Args {
    /// path to the data root holding `poses/` and `sequences/`
    #[argh(option, short = 'b')]
    base_path: Option<PathBuf>,

    /// sequence identifier, can be repeated
    #[argh(option, short = 's')]
    sequences: Vec<String>,

    /// path to a JSON dataset configuration, replaces the other flags
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// use the test split instead of the train split when no sequence is given
    #[argh(switch)]
    test_split: bool,

    /// index of a sample to write to the output directory
    #[argh(option)]
    dump: Option<usize>,

    /// directory where the dumped frames are written
    #[argh(option, default = "PathBuf::from(\"dump\")")]
    output_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = match (&args.config, &args.base_path) {
        (Some(path), _) => VoDatasetConfig::from_json_file(path)?,
        (None, Some(base_path)) if !args.sequences.is_empty() => {
            VoDatasetConfig::new(base_path, args.sequences.clone())
        }
        (None, Some(base_path)) => {
            let split = match args.test_split {
                true => SequenceSplit::Test,
                false => SequenceSplit::Train,
            };
            VoDatasetConfig::from_split(base_path, split)
        }
        (None, None) => return Err("either --config or --base-path is required".into()),
    };

    let dataset = VoDataset::new(config, PngImageLoader)?;

    println!("samples: {}", dataset.len());
    for sequence in dataset.sequences() {
        println!("  sequence {}: {} frames", sequence.id(), sequence.len());
    }

    // mean absolute motion between consecutive frames
    let mut sum = [0.0f64; 6];
    for index in 0..dataset.len() {
        let odometry = dataset.odometry(index)?;
        for (s, v) in sum.iter_mut().zip(odometry.as_array().iter()) {
            *s += v.abs();
        }
    }
    if !dataset.is_empty() {
        let n = dataset.len() as f64;
        let mean = sum.map(|s| s / n);
        println!(
            "mean |delta| rotation: [{:.6}, {:.6}, {:.6}] translation: [{:.6}, {:.6}, {:.6}]",
            mean[0], mean[1], mean[2], mean[3], mean[4], mean[5]
        );
    }

    if let Some(index) = args.dump {
        let sample = dataset.get(index)?;
        std::fs::create_dir_all(&args.output_dir)?;

        let [earlier, later] = &sample.images.images;
        let earlier_path = args.output_dir.join(format!("{:06}_a.png", index));
        let later_path = args.output_dir.join(format!("{:06}_b.png", index));
        write_image_png_rgb8(&earlier_path, earlier)?;
        write_image_png_rgb8(&later_path, later)?;
        log::info!("wrote {:?} and {:?}", earlier_path, later_path);

        let stack = sample.images.stack()?.cast_and_scale::<f32>(1.0 / 255.0)?;
        let mean_intensity =
            stack.as_slice().iter().sum::<f32>() / stack.as_slice().len().max(1) as f32;
        println!(
            "sample {}: sequence {} frame {} stack {:?} mean intensity {:.4} odometry {:?}",
            index,
            sample.sequence,
            sample.frame,
            stack.shape(),
            mean_intensity,
            sample.odometry.to_f32()
        );
    }

    Ok(())
}
