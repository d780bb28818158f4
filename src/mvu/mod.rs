// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring the form session, messages, and commands.

use std::path::PathBuf;

use log::{info, warn};

use crate::logic::session::{FormSession, SubmitPlan, UploadJob, UploadMode};
use crate::logic::submission::FormPost;
use crate::logic::validate::SubmitIntent;
use crate::models::job::{JobContext, load_job_context};
use crate::transport;
use crate::ui::components::cutoffs::{self, CutoffsMsg};
use crate::ui::components::features::{self, FeaturesMsg};
use crate::ui::components::group_queues::{
    self, GroupQueuesCommand, GroupQueuesModel, GroupQueuesMsg,
};
use crate::ui::components::uploads::{self, UploadsCommand, UploadsMsg};

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// The form being filled in.
    pub session: FormSession,
    /// Group count input state.
    pub group_queues: GroupQueuesModel,
    /// File the job context was loaded from.
    pub job_source: Option<PathBuf>,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

/// Application messages routed through the update function.
pub enum Msg {
    EmailChanged(String),
    SetMode(UploadMode),
    SubmitRequested(SubmitIntent),
    ResetRequested,
    DismissError,
    LoadJobRequested,
    JobContextLoaded {
        context: JobContext,
        source: PathBuf,
    },
    JobContextFailed(String),
    JobContextCancelled,
    FileUploaded {
        group: usize,
        path: PathBuf,
        result: Result<(), String>,
    },
    SubmitCompleted {
        intent: SubmitIntent,
        result: Result<(), String>,
    },
    Uploads(UploadsMsg),
    GroupQueues(GroupQueuesMsg),
    Features(FeaturesMsg),
    Cutoffs(CutoffsMsg),
}

/// Commands represent side-effects executed between frames.
pub enum Command {
    PickRowFile {
        index: usize,
    },
    PickQueueFiles {
        group: usize,
    },
    PickJobContextFile,
    UploadFile {
        server_url: String,
        job: UploadJob,
    },
    SubmitForm {
        server_url: String,
        endpoint: String,
        intent: SubmitIntent,
        post: FormPost,
    },
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::EmailChanged(text) => model.session.set_email(text),
        Msg::SetMode(mode) => model.session.set_mode(mode),
        Msg::DismissError => model.error = None,
        Msg::SubmitRequested(intent) => request_submit(model, intent, cmds),
        Msg::ResetRequested => {
            model.session.reset();
            model.group_queues = GroupQueuesModel::default();
            surface_event(model, "Form reset.".to_string(), false);
        }
        Msg::LoadJobRequested => {
            if model.session.is_busy() {
                surface_event(
                    model,
                    "Cannot load a job while a submission is in progress.".to_string(),
                    true,
                );
            } else {
                cmds.push(Command::PickJobContextFile);
            }
        }
        Msg::JobContextLoaded { context, source } => {
            info!("loaded job {} from {:?}", context.job_id, source);
            let message = format!("Loaded job {} from {}", context.job_id, source.display());
            model.session = FormSession::new(context);
            model.group_queues = GroupQueuesModel::default();
            model.job_source = Some(source);
            surface_event(model, message, false);
        }
        Msg::JobContextFailed(err) => {
            surface_event(model, format!("Failed to load job:\n\n{err}"), true)
        }
        Msg::JobContextCancelled => surface_event(model, "Job loading cancelled.".into(), false),
        Msg::FileUploaded {
            group,
            path,
            result,
        } => {
            if let Err(err) = &result {
                warn!("upload failed: {err}");
                surface_event(model, format!("Upload failed: {err}"), false);
            }
            let post = model
                .session
                .file_uploaded(group, &path, result.is_ok());
            match post {
                Some(post) => {
                    surface_event(model, "All groups uploaded; submitting form…".into(), false);
                    cmds.push(submit_command(&model.session, SubmitIntent::Submit, post));
                }
                None => {
                    if let (Ok(()), Some((done, total))) =
                        (&result, model.session.upload_progress())
                    {
                        surface_event(
                            model,
                            format!("Uploaded {}; {done} of {total} group(s) complete", path.display()),
                            false,
                        );
                    }
                }
            }
        }
        Msg::SubmitCompleted { intent, result } => {
            model.session.submit_finished(result.is_ok());
            match (intent, result) {
                (SubmitIntent::Submit, Ok(())) => {
                    surface_event(model, "Form submitted.".into(), false)
                }
                (SubmitIntent::Cancel, Ok(())) => {
                    surface_event(model, "Job cancelled.".into(), false)
                }
                (_, Err(err)) => {
                    surface_event(model, format!("Failed to submit form:\n\n{err}"), true)
                }
            }
        }
        Msg::Uploads(m) => {
            let mut upload_cmds = Vec::new();
            if let Some(event) = uploads::update(&mut model.session, m, &mut upload_cmds) {
                surface_event(model, event.message, event.is_error);
            }
            for c in upload_cmds {
                match c {
                    UploadsCommand::PickFile { index } => {
                        cmds.push(Command::PickRowFile { index })
                    }
                }
            }
        }
        Msg::GroupQueues(m) => {
            let mut queue_cmds = Vec::new();
            if let Some(event) = group_queues::update(
                &mut model.session,
                &mut model.group_queues,
                m,
                &mut queue_cmds,
            ) {
                surface_event(model, event.message, event.is_error);
            }
            for c in queue_cmds {
                match c {
                    GroupQueuesCommand::PickFiles { group } => {
                        cmds.push(Command::PickQueueFiles { group })
                    }
                }
            }
        }
        Msg::Features(m) => {
            if let Some(event) = features::update(&mut model.session, m) {
                surface_event(model, event.message, event.is_error);
            }
        }
        Msg::Cutoffs(m) => cutoffs::update(&mut model.session, m),
    }
}

/// Execute a command synchronously and return a resulting message.
pub fn run_command(cmd: Command) -> Msg {
    match cmd {
        Command::PickRowFile { index } => {
            let path = rfd::FileDialog::new()
                .set_title("Select RCC file")
                .add_filter("RCC files", &["rcc", "RCC"])
                .pick_file();
            Msg::Uploads(UploadsMsg::FilePicked { index, path })
        }
        Command::PickQueueFiles { group } => {
            let files = rfd::FileDialog::new()
                .set_title(format!("Select RCC files for group {}", group + 1))
                .add_filter("RCC files", &["rcc", "RCC"])
                .pick_files()
                .unwrap_or_default()
                .into_iter()
                .map(|path| {
                    let size = path.metadata().map(|m| m.len()).unwrap_or(0);
                    (path, size)
                })
                .collect();
            Msg::GroupQueues(GroupQueuesMsg::FilesPicked { group, files })
        }
        Command::PickJobContextFile => {
            let file = rfd::FileDialog::new()
                .set_title("Select job context JSON")
                .add_filter("JSON", &["json"])
                .pick_file();

            match file {
                Some(path) => match load_job_context(&path) {
                    Ok(context) => Msg::JobContextLoaded {
                        context,
                        source: path,
                    },
                    Err(err) => Msg::JobContextFailed(format!("{err:#}")),
                },
                None => Msg::JobContextCancelled,
            }
        }
        Command::UploadFile { server_url, job } => {
            let result = transport::upload_file(&server_url, &job.transport, &job.path)
                .map_err(|e| format!("{e:#}"));
            Msg::FileUploaded {
                group: job.group,
                path: job.path,
                result,
            }
        }
        Command::SubmitForm {
            server_url,
            endpoint,
            intent,
            post,
        } => {
            let result =
                transport::submit_form(&server_url, &endpoint, &post).map_err(|e| format!("{e:#}"));
            Msg::SubmitCompleted { intent, result }
        }
    }
}

/// Validate and turn the submission plan into commands.
fn request_submit(model: &mut AppModel, intent: SubmitIntent, cmds: &mut Vec<Command>) {
    match model.session.begin_submit(intent) {
        Ok(SubmitPlan::Post(post)) => {
            surface_event(model, "Submitting form…".into(), false);
            cmds.push(submit_command(&model.session, intent, post));
        }
        Ok(SubmitPlan::Upload(jobs)) => {
            let server_url = model.session.context().server_url.clone();
            surface_event(model, format!("Uploading {} file(s)…", jobs.len()), false);
            cmds.extend(jobs.into_iter().map(|job| Command::UploadFile {
                server_url: server_url.clone(),
                job,
            }));
        }
        Err(msgs) => surface_event(model, msgs.join("\n"), true),
    }
}

fn submit_command(session: &FormSession, intent: SubmitIntent, post: FormPost) -> Command {
    let context = session.context();
    Command::SubmitForm {
        server_url: context.server_url.clone(),
        endpoint: context.settings.submit_endpoint.clone(),
        intent,
        post,
    }
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}
