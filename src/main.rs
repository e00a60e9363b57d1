//! Headless runner: loads configuration, refreshes the snapshot from the
//! live services and logs every published state until Ctrl-C.

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use fitness_tracker::adapters::{HttpUsersApi, HttpWorkoutsApi};
use fitness_tracker::application::{FitnessRepository, FitnessUiState, MainViewModel};
use fitness_tracker::config::{AppConfig, LogFormat};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    let view_model = match build_view_model(&config) {
        Ok(view_model) => Arc::new(view_model),
        Err(e) => {
            tracing::error!("Failed to create service clients: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        user_id = %config.client.user_id,
        workouts = %config.api.workouts_base_url,
        "Starting fitness tracker"
    );

    let mut states = view_model.subscribe();
    let refresher = Arc::clone(&view_model);
    tokio::spawn(async move { refresher.refresh_everything().await });

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                log_snapshot(&states.borrow_and_update());
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    ExitCode::SUCCESS
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.client.log_level));

    match config.client.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

fn build_view_model(
    config: &AppConfig,
) -> Result<MainViewModel, fitness_tracker::ports::ApiError> {
    let users = HttpUsersApi::from_config(&config.api)?;
    let workouts = HttpWorkoutsApi::from_config(&config.api)?;

    let repository = FitnessRepository::new(
        config.client.user_id.clone(),
        Arc::new(workouts),
        Arc::new(users),
    )
    .with_workout_fetch_limit(config.api.workout_fetch_limit);

    Ok(MainViewModel::new(Arc::new(repository)).with_timezone(Some(config.client.timezone())))
}

fn log_snapshot(state: &FitnessUiState) {
    let user = state
        .user
        .as_ref()
        .and_then(|user| user.display_name())
        .unwrap_or_default();

    tracing::info!(
        user = %user,
        workouts = state.workouts.len(),
        plans = state.workout_plans.len(),
        exercises = state.exercises.len(),
        selected = ?state.selected_workout_id,
        loading = state.is_loading,
        busy = state.is_action_running,
        "State updated"
    );

    if let Some(error) = &state.error_message {
        tracing::warn!("{}", error);
    }
    if let Some(workout) = &state.selected_workout {
        tracing::debug!(
            "Selected workout {} on {}: {} items, {} sets",
            workout.id,
            workout.date_key(),
            workout.items.len(),
            workout.set_count()
        );
    }
}
