//! Weekly reflection run: ingest (or reuse cached tables), perceive,
//! reflect, whisper.

use std::process::ExitCode;

use reflectos::config::Config;
use reflectos::ingest;
use reflectos::openai_api::OpenAiClient;
use reflectos::pipeline::Pipeline;
use reflectos::store;
use reflectos::types::PipelineState;
use reflectos::PipelineError;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.stage() {
                Some(stage) => log::error!("run failed in {stage} stage: {e}"),
                None => log::error!("run failed: {e}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), PipelineError> {
    let config = Config::load()?;
    let tables = config.tables_dir();

    let cached = [
        store::WEEKLY_NOTES_TABLE,
        store::SCREEN_TIME_TABLE,
        store::CALENDAR_TABLE,
        store::JOURNAL_TABLE,
    ]
    .iter()
    .all(|name| store::table_exists(&tables, name))
        && store::journal_text_exists(&tables);

    let mut state = PipelineState::new();
    if cached {
        log::info!("loading cached tables from {}", tables.display());
        state.weekly_notes = Some(store::load_table(&tables, store::WEEKLY_NOTES_TABLE)?);
        state.screen_time = Some(store::load_table(&tables, store::SCREEN_TIME_TABLE)?);
        state.calendar = Some(store::load_table(&tables, store::CALENDAR_TABLE)?);
        state.journal_text = Some(store::load_journal_text(&tables)?);
    } else {
        log::info!("ingesting raw artifacts from {}", config.data_dir().display());
        let client = OpenAiClient::new(config.openai_key()?);
        let data = ingest::ingest_all(&config, &client).await?;

        store::save_table(&tables, store::WEEKLY_NOTES_TABLE, &data.weekly_notes)?;
        store::save_table(&tables, store::SCREEN_TIME_TABLE, &data.screen_time.rows)?;
        store::save_table(&tables, store::CALENDAR_TABLE, &data.calendar.rows)?;
        store::save_table(&tables, store::JOURNAL_TABLE, &data.journal.rows)?;
        store::save_journal_text(&tables, &data.journal_text)?;

        state.weekly_notes = Some(data.weekly_notes);
        state.screen_time = Some(data.screen_time.rows);
        state.calendar = Some(data.calendar.rows);
        state.journal_text = Some(data.journal_text);
    }

    let pipeline = Pipeline::from_config(&config)?;
    let state = pipeline.run(state).await?;

    if let Some(perception) = &state.perception {
        store::save_table(&tables, store::WEEKLY_PERCEPTION_TABLE, &[perception.clone()])?;
    }
    if let Some(status) = &state.whisper_status {
        log::info!(
            "whispered to {} ({}): {}",
            status.to,
            status.status,
            status.preview
        );
    }
    Ok(())
}
