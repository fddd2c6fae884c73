use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};

use auraderm_core::advice::domain::recommendation::{Recommendation, RecommendationCatalog};
use auraderm_core::advice::infrastructure::static_catalog::StaticCatalog;
use auraderm_core::classification::domain::skin_condition::SkinCondition;
use auraderm_core::classification::infrastructure::onnx_deepfake_scorer::OnnxDeepfakeScorer;
use auraderm_core::classification::infrastructure::onnx_skin_classifier::OnnxSkinClassifier;
use auraderm_core::detection::domain::face_cropper::FaceCropper;
use auraderm_core::detection::infrastructure::onnx_face_detector::{
    OnnxFaceDetector, DEFAULT_CONFIDENCE,
};
use auraderm_core::pipeline::analyze_skin_use_case::{AnalyzeSkinUseCase, SkinAnalysis};
use auraderm_core::pipeline::detect_deepfake_use_case::DetectDeepfakeUseCase;
use auraderm_core::pipeline::evaluate_detector_use_case::{
    discover_dataset, EvaluateDetectorUseCase,
};
use auraderm_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use auraderm_core::report::domain::report_writer::ReportWriter;
use auraderm_core::report::infrastructure::json_report_writer::JsonReportWriter;
use auraderm_core::report::infrastructure::text_report_writer::TextReportWriter;
use auraderm_core::sampling::domain::frame_sampler::FrameSampler;
use auraderm_core::sampling::domain::sample_request::SampleRequest;
use auraderm_core::shared::constants::{
    DEEPFAKE_MODEL_NAME, DEFAULT_FAKE_THRESHOLD, DEFAULT_FRAMES_PER_CLIP, DEFAULT_SAMPLE_SIZE,
    FACE_MODEL_NAME, FACE_MODEL_URL, IMAGE_EXTENSIONS, REPORT_DIR_NAME, SKIN_MODEL_NAME,
    VIDEO_EXTENSIONS,
};
use auraderm_core::shared::model_resolver::{self, ModelSource};
use auraderm_core::video::domain::image_writer::ImageWriter;
use auraderm_core::video::infrastructure::ffmpeg_source::{FfmpegSource, FfmpegSourceOpener};
use auraderm_core::video::infrastructure::image_file_reader::ImageFileReader;
use auraderm_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// Skin condition analysis and video deepfake detection.
#[derive(Parser)]
#[command(name = "auraderm")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify the skin condition in a face photo and print care advice.
    Skin(SkinArgs),
    /// Decide whether a video is real or synthetic.
    Deepfake(DeepfakeArgs),
    /// Save uniformly sampled frames from a video as PNG files.
    Sample(SampleArgs),
    /// Measure detector accuracy on a labeled clip dataset.
    Evaluate(EvaluateArgs),
    /// Print the built-in recommendations.
    Catalog(CatalogArgs),
}

#[derive(Args)]
struct SkinArgs {
    /// Face photo (jpg, png, ...).
    image: PathBuf,

    /// Name shown in the report and used in its file name.
    #[arg(long, default_value = "guest")]
    user: String,

    /// Classify the whole image instead of the detected face.
    #[arg(long)]
    no_crop: bool,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Write a report into this directory (default: ./prescriptions).
    #[arg(long, num_args = 0..=1, default_missing_value = REPORT_DIR_NAME)]
    report_dir: Option<PathBuf>,

    /// Output format: text or json.
    #[arg(long, default_value = "text")]
    format: String,

    /// Skin classifier ONNX model.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Face detector ONNX model.
    #[arg(long)]
    face_model: Option<PathBuf>,
}

#[derive(Args)]
struct DeepfakeArgs {
    /// Input video file.
    video: PathBuf,

    /// Frames to sample from the clip.
    #[arg(long, default_value_t = DEFAULT_FRAMES_PER_CLIP)]
    frames: usize,

    /// Side length of the square frames fed to the model.
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    size: u32,

    /// Mean fake score above which the clip is called fake (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_FAKE_THRESHOLD)]
    threshold: f32,

    /// Deepfake detector ONNX model.
    #[arg(long)]
    model: Option<PathBuf>,
}

#[derive(Args)]
struct SampleArgs {
    /// Input video file.
    video: PathBuf,

    /// Directory for the extracted frames.
    out_dir: PathBuf,

    #[arg(long, default_value_t = DEFAULT_FRAMES_PER_CLIP)]
    frames: usize,

    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    width: u32,

    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    height: u32,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Dataset root containing Celeb-real/ and Celeb-synthesis/.
    data_dir: PathBuf,

    /// Maximum clips per class.
    #[arg(long)]
    limit: Option<usize>,

    #[arg(long, default_value_t = DEFAULT_FRAMES_PER_CLIP)]
    frames: usize,

    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    size: u32,

    /// Deepfake detector ONNX model.
    #[arg(long)]
    model: Option<PathBuf>,
}

#[derive(Args)]
struct CatalogArgs {
    /// Condition to show (acne, dark spots, pigmentation, wrinkles).
    condition: Option<String>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli.command)?;

    match cli.command {
        Command::Skin(args) => run_skin(args),
        Command::Deepfake(args) => run_deepfake(args),
        Command::Sample(args) => run_sample(args),
        Command::Evaluate(args) => run_evaluate(args),
        Command::Catalog(args) => {
            run_catalog(args);
            Ok(())
        }
    }
}

fn run_skin(args: SkinArgs) -> Result<(), Box<dyn std::error::Error>> {
    let model_path = resolve_model(SKIN_MODEL_NAME, None, args.model.as_deref())?;
    let classifier = Box::new(OnnxSkinClassifier::new(&model_path)?);

    let cropper = if args.no_crop {
        None
    } else {
        let face_path = resolve_model(
            FACE_MODEL_NAME,
            Some(FACE_MODEL_URL),
            args.face_model.as_deref(),
        )?;
        let detector = OnnxFaceDetector::new(&face_path, args.confidence)?;
        Some(FaceCropper::new(Box::new(detector)))
    };

    let mut use_case = AnalyzeSkinUseCase::new(
        Box::new(ImageFileReader::new()),
        cropper,
        classifier,
        Box::new(StaticCatalog::new()),
    );
    let analysis = use_case.execute(&args.image)?;

    let json = args.format == "json";
    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_analysis(&analysis);
    }

    if let Some(dir) = args.report_dir {
        let writer: Box<dyn ReportWriter> = if json {
            Box::new(JsonReportWriter)
        } else {
            Box::new(TextReportWriter)
        };
        let path = writer.write(&dir, &analysis.into_report(&args.user))?;
        eprintln!("Report saved to {}", path.display());
    }
    Ok(())
}

fn run_deepfake(args: DeepfakeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let model_path = resolve_model(DEEPFAKE_MODEL_NAME, None, args.model.as_deref())?;
    let scorer = Box::new(OnnxDeepfakeScorer::new(&model_path)?);

    let mut source = FfmpegSource::new();
    let metadata = source.open(&args.video)?;
    log::info!(
        "{}: {}x{}, {} frames at {:.2} fps",
        args.video.display(),
        metadata.width,
        metadata.height,
        metadata.total_frames,
        metadata.fps
    );

    let mut use_case = DetectDeepfakeUseCase::new(
        scorer,
        SampleRequest::new(args.frames, (args.size, args.size)),
        args.threshold,
        Box::new(StdoutPipelineLogger::default()),
    );
    let verdict = use_case.execute(&mut source)?;
    source.close();

    match verdict {
        Some(v) => {
            println!("Prediction: {}", v.label);
            println!("Confidence: {:.2}", v.confidence);
        }
        None => println!("Unable to process video"),
    }
    use_case.finish();
    Ok(())
}

fn run_sample(args: SampleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut source = FfmpegSource::open_path(&args.video)?;
    let request = SampleRequest::new(args.frames, (args.width, args.height));
    let batch = FrameSampler::new().sample(&mut source, &request)?;
    source.close();

    let writer = ImageFileWriter::new();
    for frame in batch.frames() {
        let path = args.out_dir.join(format!("frame_{:06}.png", frame.index()));
        writer.write(&path, frame)?;
    }

    println!(
        "Saved {} of {} requested frames to {}",
        batch.len(),
        args.frames,
        args.out_dir.display()
    );
    println!("Attempted: {}, skipped: {}", batch.attempted(), batch.skipped());
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let clips = discover_dataset(&args.data_dir, args.limit)?;
    let model_path = resolve_model(DEEPFAKE_MODEL_NAME, None, args.model.as_deref())?;
    let scorer = Box::new(OnnxDeepfakeScorer::new(&model_path)?);

    let detector = DetectDeepfakeUseCase::new(
        scorer,
        SampleRequest::new(args.frames, (args.size, args.size)),
        DEFAULT_FAKE_THRESHOLD,
        Box::new(StdoutPipelineLogger::new(1)),
    );
    let mut use_case = EvaluateDetectorUseCase::new(Box::new(FfmpegSourceOpener), detector);
    let metrics = use_case.execute(&clips)?;

    println!(
        "Evaluated {} of {} clips ({} unprocessable)",
        metrics.evaluated(),
        clips.len(),
        metrics.unprocessable
    );
    println!("Accuracy:  {:.4}", metrics.accuracy());
    println!("Precision: {:.4}", metrics.precision());
    println!("Recall:    {:.4}", metrics.recall());
    Ok(())
}

fn run_catalog(args: CatalogArgs) {
    let catalog = StaticCatalog::new();
    match args.condition {
        Some(label) => print_recommendation(&catalog.lookup(&label)),
        None => {
            for condition in SkinCondition::ALL {
                println!("== {} ==", condition.title());
                print_recommendation(&catalog.recommend(condition));
                println!();
            }
        }
    }
}

fn print_analysis(analysis: &SkinAnalysis) {
    let prediction = &analysis.prediction;
    println!(
        "Condition: {} ({:.1}%)",
        prediction.condition.title(),
        prediction.confidence() * 100.0
    );
    println!(
        "Face detected: {}",
        if analysis.face_found { "yes" } else { "no" }
    );
    println!("Probabilities:");
    for (condition, p) in prediction.ranked() {
        println!("  {:<14}{:>6.1}%", condition.title(), p * 100.0);
    }
    println!();
    print_recommendation(&analysis.recommendation);
}

fn print_recommendation(rec: &Recommendation) {
    println!("Products:");
    for product in &rec.products {
        println!("  - {} ({})", product.name, product.kind);
    }
    println!("Acids:");
    for acid in &rec.acids {
        println!("  - {acid}");
    }
    println!("Foods to eat: {}", rec.diet.eat.join(", "));
    println!("Foods to avoid: {}", rec.diet.avoid.join(", "));
    println!("Timing: {}", rec.timing);
}

fn resolve_model(
    name: &str,
    url: Option<&str>,
    override_path: Option<&Path>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {name}");
    let bundled = bundled_model_dir();
    let mut source = ModelSource::named(name)
        .with_override(override_path)
        .with_bundled_dir(bundled.as_deref());
    if let Some(url) = url {
        source = source.with_url(url);
    }
    let path = model_resolver::resolve(&source, Some(Box::new(download_progress)))?;
    log::debug!("Model {name} at {}", path.display());
    Ok(path)
}

/// `models/` next to the executable.
fn bundled_model_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("models")))
}

fn validate(command: &Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Skin(args) => {
            require_file(&args.image, IMAGE_EXTENSIONS, "image")?;
            if !(0.0..=1.0).contains(&args.confidence) {
                return Err(format!(
                    "Confidence must be between 0.0 and 1.0, got {}",
                    args.confidence
                )
                .into());
            }
            if args.format != "text" && args.format != "json" {
                return Err(
                    format!("Format must be 'text' or 'json', got '{}'", args.format).into(),
                );
            }
        }
        Command::Deepfake(args) => {
            require_file(&args.video, VIDEO_EXTENSIONS, "video")?;
            validate_sampling(args.frames, args.size, args.size)?;
            if !(0.0..=1.0).contains(&args.threshold) {
                return Err(format!(
                    "Threshold must be between 0.0 and 1.0, got {}",
                    args.threshold
                )
                .into());
            }
        }
        Command::Sample(args) => {
            require_file(&args.video, VIDEO_EXTENSIONS, "video")?;
            validate_sampling(args.frames, args.width, args.height)?;
        }
        Command::Evaluate(args) => {
            if !args.data_dir.is_dir() {
                return Err(
                    format!("Dataset directory not found: {}", args.data_dir.display()).into(),
                );
            }
            if args.limit == Some(0) {
                return Err("Limit must be at least 1".into());
            }
            validate_sampling(args.frames, args.size, args.size)?;
        }
        Command::Catalog(_) => {}
    }
    Ok(())
}

fn validate_sampling(frames: usize, width: u32, height: u32) -> Result<(), Box<dyn std::error::Error>> {
    SampleRequest::new(frames, (width, height)).validate()?;
    Ok(())
}

fn require_file(
    path: &Path,
    extensions: &[&str],
    kind: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("Input file not found: {}", path.display()).into());
    }
    if !has_extension(path, extensions) {
        log::warn!(
            "{} does not look like a {kind} file ({})",
            path.display(),
            extensions.join(", ")
        );
    }
    Ok(())
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading model... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading model... {downloaded} bytes");
    }
}
