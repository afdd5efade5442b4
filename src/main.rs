use clap::Parser;
use fitroom::config::cli::Command;
use fitroom::core::classifier::recommend;
use fitroom::core::presentation::{ConsoleSink, PresentationSink};
use fitroom::core::report::SizeReport;
use fitroom::core::session::follow;
use fitroom::core::{ConfigProvider, ImageCodec, Storage};
use fitroom::utils::error::ErrorSeverity;
use fitroom::utils::{logger, validation};
use fitroom::utils::validation::Validate;
use fitroom::{
    Base64Codec, CliConfig, FitError, FittingSession, GateOutcome, HttpMeasurementService,
    ImageSource, LocalStorage, MeasurementSample, SelectionStore, Settings,
};

type Session = FittingSession<HttpMeasurementService, Base64Codec>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::info!("Starting fitroom");

    let settings = match cli.resolve_settings().and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Configuration validation failed: {}", e);
            tracing::error!("Suggestion: {}", e.recovery_suggestion());
            eprintln!("{}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    tracing::debug!("Resolved settings: {:?}", settings);

    if let Err(e) = run(&cli.command, &settings).await {
        tracing::error!(
            "fitroom failed: {} (kind: {:?}, severity: {:?})",
            e,
            e.kind(),
            e.severity()
        );
        eprintln!("{}", e.user_friendly_message());
        eprintln!("Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn build_session(settings: &Settings) -> fitroom::Result<Session> {
    let service =
        HttpMeasurementService::new(settings.service_endpoint(), settings.request_timeout())?;
    let client = reqwest::Client::builder()
        .timeout(settings.request_timeout())
        .build()?;

    Ok(FittingSession::from_config(
        settings,
        service,
        Base64Codec::new(client),
    ))
}

fn image_source(field: &str, reference: &str) -> fitroom::Result<ImageSource> {
    let source = ImageSource::parse(reference);
    if let ImageSource::File(path) = &source {
        validation::validate_image_extension(field, &path.to_string_lossy())?;
    }
    Ok(source)
}

async fn run(command: &Command, settings: &Settings) -> fitroom::Result<()> {
    let mut sink = ConsoleSink::new(std::io::stdout());

    match command {
        Command::Classify {
            chest,
            shoulder,
            hip,
            profile,
        } => {
            let sample = MeasurementSample {
                chest: *chest,
                shoulder: *shoulder,
                hip: *hip,
                thigh: None,
            };
            let unit = settings.measurement_unit();
            let mut report = SizeReport::from_sample(sample, unit);
            match profile {
                Some(only) => {
                    report.recommendations.retain(|r| r.profile == *only);
                    sink.measurements(&report)?;
                    let label = recommend(&sample, unit, only.profile())?;
                    tracing::info!("{} chart recommends {}", only, label);
                }
                None => sink.measurements(&report)?,
            }
        }

        Command::Measure { image } => {
            let person = image_source("image", image)?;
            let session = build_session(settings)?;
            let handle = session.measure(person);

            tokio::select! {
                revealed = session.reveal_measurements(handle, &mut sink) => {
                    revealed?;
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::warn!("Interrupted, discarding pending measurement");
                    return Err(FitError::Cancelled);
                }
            }
        }

        Command::TryOn {
            image,
            garment,
            region,
        } => {
            let person = image_source("image", image)?;
            let mut selection = SelectionStore::new();
            selection.select_garment(image_source("garment", garment)?);
            selection.set_region(*region);

            let session = build_session(settings)?;
            let handle = session.try_on(person, &selection)?;

            let outcome = tokio::select! {
                outcome = follow(handle, &mut sink) => outcome?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::warn!("Interrupted, discarding pending try-on");
                    return Err(FitError::Cancelled);
                }
            };

            match outcome {
                GateOutcome::Success(result) => {
                    let bytes = session
                        .codec()
                        .decode(result.image.as_deref().unwrap_or_default())?;
                    let storage = LocalStorage::new(settings.output_path().to_string());
                    let name = format!(
                        "tryon_{}.jpg",
                        chrono::Local::now().format("%Y%m%d_%H%M%S")
                    );
                    let saved = storage.write_file(&name, &bytes).await?;
                    sink.try_on(&saved)?;
                }
                GateOutcome::Empty => sink.failure(&FitError::NoDetection)?,
                GateOutcome::Failure(e) => sink.failure(&e)?,
            }
        }

        Command::SetFactor { key, value } => {
            let session = build_session(settings)?;
            // Waiting on the task only keeps the process alive until it is sent.
            if let Err(e) = session.update_conversion(key.clone(), *value).await {
                tracing::warn!("Conversion update task aborted: {}", e);
            }
        }
    }

    Ok(())
}
