//! Command execution.
//!
//! Each command returns the text to print so the binary stays a thin shell.

use chrono::Utc;
use widgetdash_core::community::{InstallOutcome, CATEGORIES};
use widgetdash_core::editor::{find_preset, WidgetDraft};
use widgetdash_core::error::CoreError;
use widgetdash_core::export::ExportDocument;
use widgetdash_core::render::{test_result_preview, widget_card, PreviewMode, WidgetCard};
use widgetdash_core::settings::SettingChange;
use widgetdash_core::widget::Widget;
use widgetdash_db::repositories::{SaveOutcome, SettingsRepo, WidgetRepo};

use crate::cli::{Command, WidgetArgs, USAGE};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::view;

pub async fn run(state: &AppState, command: Command) -> AppResult<String> {
    match command {
        Command::List => list(state).await,
        Command::Refresh => refresh(state).await,
        Command::Show { id, expanded, raw } => show(state, &id, expanded, raw).await,
        Command::Add(args) => save(state, WidgetDraft::default(), args).await,
        Command::Edit { id, args } => {
            let widget = WidgetRepo::find(state.store.as_ref(), &id)
                .await
                .ok_or_else(|| not_found("widget", &id))?;
            save(state, WidgetDraft::from_widget(&widget), args).await
        }
        Command::Remove { id } => remove(state, &id).await,
        Command::Test { url } => test_endpoint(state, &url).await,
        Command::Community { category } => community(state, &category).await,
        Command::Install { title } => install(state, &title).await,
        Command::Settings => Ok(view::settings(&SettingsRepo::load(state.store.as_ref()).await)),
        Command::Set(change) => set(state, change).await,
        Command::Export => export(state).await,
        Command::Presets => Ok(view::presets(state.theme.is_dark())),
        Command::Help => Ok(USAGE.to_string()),
    }
}

fn not_found(entity: &'static str, id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity,
        id: id.to_string(),
    })
}

fn cards(state: &AppState, widgets: &[Widget]) -> Vec<WidgetCard> {
    let dark = state.theme.is_dark();
    widgets
        .iter()
        .map(|w| widget_card(w, dark, PreviewMode::Collapsed))
        .collect()
}

async fn list(state: &AppState) -> AppResult<String> {
    let widgets = WidgetRepo::list(state.store.as_ref()).await;
    Ok(view::dashboard(&cards(state, &widgets)))
}

async fn refresh(state: &AppState) -> AppResult<String> {
    let widgets = state.sync.refresh().await;
    Ok(view::dashboard(&cards(state, &widgets)))
}

async fn show(state: &AppState, id: &str, expanded: bool, raw: bool) -> AppResult<String> {
    let widget = WidgetRepo::find(state.store.as_ref(), id)
        .await
        .ok_or_else(|| not_found("widget", id))?;

    let mode = if expanded {
        PreviewMode::Expanded
    } else {
        PreviewMode::Collapsed
    };
    let card = widget_card(&widget, state.theme.is_dark(), mode);

    match (raw, &card.raw) {
        (true, Some(raw)) => Ok(format!("{raw}\n")),
        (true, None) => Err(AppError::Usage(
            "Raw view is only available for text and object payloads".into(),
        )),
        (false, _) => Ok(view::card(&card)),
    }
}

/// Apply command-line values over a draft. The preset goes first so explicit
/// colors override it.
fn apply_args(draft: &mut WidgetDraft, args: WidgetArgs) -> AppResult<()> {
    if let Some(name) = &args.preset {
        let preset = find_preset(name)
            .ok_or_else(|| AppError::Usage(format!("Unknown preset {name:?}")))?;
        draft.apply_preset(preset);
    }
    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(url) = args.url {
        draft.api_url = url;
    }
    if let Some(interval) = args.interval {
        draft.refresh_interval = Some(interval);
    }
    if let Some(background) = args.background {
        draft.background_color = background;
    }
    if let Some(text) = args.text {
        draft.text_color = text;
    }
    for field_id in &args.remove_fields {
        draft.remove_field(field_id);
    }
    for field in &args.fields {
        draft.add_field(&field.label, &field.key, field.field_type)?;
    }
    Ok(())
}

async fn save(state: &AppState, mut draft: WidgetDraft, args: WidgetArgs) -> AppResult<String> {
    apply_args(&mut draft, args)?;
    let (widget, outcome) = WidgetRepo::save(state.store.as_ref(), draft).await?;
    let verb = match outcome {
        SaveOutcome::Created => "Created",
        SaveOutcome::Updated => "Updated",
    };
    Ok(format!(
        "{verb} widget {:?} [{}]. Run `widgetdash refresh` to fetch its data.\n",
        widget.title, widget.id
    ))
}

async fn remove(state: &AppState, id: &str) -> AppResult<String> {
    if !WidgetRepo::delete(state.store.as_ref(), id).await? {
        return Err(not_found("widget", id));
    }
    Ok(format!("Deleted widget {id}.\n"))
}

async fn test_endpoint(state: &AppState, url: &str) -> AppResult<String> {
    let result = state.sync.normalizer().test_endpoint(url).await?;
    let status = if result.reachable {
        "Success"
    } else {
        "Connection failed"
    };
    Ok(format!("{status}\n{}\n", test_result_preview(&result.data)))
}

async fn community(state: &AppState, category: &str) -> AppResult<String> {
    let category = CATEGORIES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(category))
        .ok_or_else(|| {
            AppError::Usage(format!(
                "Unknown category {category:?}; expected one of {}",
                CATEGORIES.join(", ")
            ))
        })?;
    let listings = state.community.browse(category).await;
    Ok(view::community(category, &listings))
}

async fn install(state: &AppState, title: &str) -> AppResult<String> {
    let outcome = state
        .community
        .install_by_title(title)
        .await?
        .ok_or_else(|| not_found("community widget", title))?;
    Ok(match outcome {
        InstallOutcome::Installed(widget) => {
            format!("Installed {:?} as [{}].\n", widget.title, widget.id)
        }
        InstallOutcome::AlreadyInstalled { existing_id } => {
            format!("{title:?} is already installed as [{existing_id}].\n")
        }
    })
}

async fn set(state: &AppState, change: SettingChange) -> AppResult<String> {
    match change {
        SettingChange::DarkMode(dark) => state.theme.set_dark_mode(dark).await?,
        other => {
            SettingsRepo::update(state.store.as_ref(), other).await?;
        }
    }
    Ok(view::settings(&SettingsRepo::load(state.store.as_ref()).await))
}

async fn export(state: &AppState) -> AppResult<String> {
    let widgets = WidgetRepo::list(state.store.as_ref()).await;
    let settings = SettingsRepo::load(state.store.as_ref()).await;
    let document = ExportDocument::new(widgets, settings, Utc::now());
    Ok(format!("{}\n", document.to_pretty_json()?))
}
