use std::process::ExitCode;

use engine::{run_app, AssetLoader, Scene};
use platformer::tuning::TUNING_FILE_NAME;
use platformer::{PlatformerScene, SetupError, Tuning};
use tracing::error;

use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let viewport = app.config.viewport;
    let tuning_path = app.paths.asset_dir.join(TUNING_FILE_NAME);

    let result = run_app(
        app.config,
        app.paths.asset_dir,
        move |loader: &mut dyn AssetLoader| -> Result<Box<dyn Scene>, SetupError> {
            let tuning = Tuning::load_or_default(&tuning_path)?;
            let scene = PlatformerScene::build(loader, tuning, viewport)?;
            Ok(Box::new(scene))
        },
    );

    if let Err(err) = result {
        error!(error = %err, "app_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
