//! The state machine behind an interactive session
//!
//! A [`Controller`] receives [`Event`]s from a front end and reports everything the user should see
//! as [`Output`]s on a [`Surface`]. Outputs are pushed as they happen, so a front end can show
//! progress while the model is working.
use std::path::PathBuf;

use retablo_core::Record;

use crate::{
    ExampleStore,
    describer::Describer,
    errors::ValidationError,
    image::ImageSource,
    questions::{follow_up_questions, placeholder_answer},
};

pub const PROGRESS: &str = "Generando descripción...";
pub const SUCCESS: &str = "Descripción generada con éxito.";
pub const DESCRIPTION_HEADER: &str = "Descripción en español:";
pub const FAILURE_PREFIX: &str = "Error al generar la descripción: ";
pub const EMPTY_HISTORY: &str = "No hay descripciones generadas aún.";
pub const HISTORY_HIDDEN: &str = "Historial oculto.";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum State {
    /// Image or title still missing
    Idle,
    AwaitingInput,
    Generating,
    /// A description was generated and saved; follow-up questions can be asked
    Displayed,
    /// Transient; the controller moves on to `AwaitingInput` within the same event
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SelectImage(ImageSource),
    SetTitle(String),
    Generate,
    ToggleHistory,
    /// Zero based index into the follow-up questions
    AskQuestion(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Notice(String),
    Progress(String),
    Success(String),
    Error(String),
    Image(String),
    Description(String),
    Questions(Vec<String>),
    History(Vec<Record>),
    Answer(String),
}

/// Anything that can show outputs to the user
pub trait Surface {
    fn show(&mut self, output: Output);
}

/// Collects outputs, mostly useful in tests
impl Surface for Vec<Output> {
    fn show(&mut self, output: Output) {
        self.push(output);
    }
}

#[derive(Debug)]
pub struct Controller {
    describer: Describer,
    store: ExampleStore,
    state: State,
    image: Option<ImageSource>,
    title: String,
    questions: Vec<String>,
    show_history: bool,
    staging_dir: PathBuf,
}

impl Controller {
    pub fn new(describer: Describer, store: ExampleStore) -> Self {
        Self {
            describer,
            store,
            state: State::Idle,
            image: None,
            title: String::new(),
            questions: Vec::new(),
            show_history: false,
            staging_dir: std::env::temp_dir(),
        }
    }

    /// Stage uploaded images in `dir` instead of the system temp directory
    #[must_use]
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn store(&self) -> &ExampleStore {
        &self.store
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn history_visible(&self) -> bool {
        self.show_history
    }

    /// Applies a single event, showing its outputs on `surface`
    pub async fn handle(&mut self, event: Event, surface: &mut dyn Surface) {
        let before = self.state;

        match event {
            Event::SelectImage(source) => self.select_image(source, surface),
            Event::SetTitle(title) => self.set_title(&title),
            Event::Generate => self.generate(surface).await,
            Event::ToggleHistory => self.toggle_history(surface),
            Event::AskQuestion(index) => self.ask_question(index, surface),
        }

        if before != self.state {
            tracing::debug!(from = %before, to = %self.state, "State changed");
        }
    }

    fn select_image(&mut self, source: ImageSource, surface: &mut dyn Surface) {
        if let Err(err) = source.check() {
            surface.show(Output::Notice(err.to_string()));
            return;
        }

        surface.show(Output::Image(source.display()));
        self.image = Some(source);
        self.state = self.input_state();
    }

    fn set_title(&mut self, title: &str) {
        title.trim().clone_into(&mut self.title);
        self.state = self.input_state();
    }

    fn input_state(&self) -> State {
        if self.image.is_some() && !self.title.is_empty() {
            State::AwaitingInput
        } else {
            State::Idle
        }
    }

    fn validate_inputs(&self) -> Result<&ImageSource, ValidationError> {
        let image = self.image.as_ref().ok_or(ValidationError::MissingImage)?;

        if self.title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        Ok(image)
    }

    async fn generate(&mut self, surface: &mut dyn Surface) {
        let image = match self.validate_inputs() {
            Ok(image) => image.clone(),
            Err(err) => {
                surface.show(Output::Notice(err.to_string()));
                return;
            }
        };

        self.state = State::Generating;
        self.questions.clear();
        surface.show(Output::Progress(PROGRESS.to_string()));

        match self.try_generate(&image, surface).await {
            Ok(description) => {
                self.questions = follow_up_questions(&description);
                surface.show(Output::Questions(self.questions.clone()));
                self.state = State::Displayed;

                if self.show_history {
                    surface.show(Output::History(self.store.records().to_vec()));
                }
            }
            Err(err) => {
                tracing::warn!("Generation failed: {err:#}");
                self.state = State::Failed;
                surface.show(Output::Error(format!("{FAILURE_PREFIX}{err:#}")));
                self.state = State::AwaitingInput;
            }
        }
    }

    async fn try_generate(
        &mut self,
        image: &ImageSource,
        surface: &mut dyn Surface,
    ) -> anyhow::Result<String> {
        let reference = image.resolve_in(&self.staging_dir).await?;

        let examples = self.store.combined_examples();
        let description = self.describer.describe(&examples, &self.title).await?;

        surface.show(Output::Success(SUCCESS.to_string()));
        surface.show(Output::Notice(DESCRIPTION_HEADER.to_string()));
        surface.show(Output::Description(description.clone()));

        let record = Record {
            image: reference,
            title: self.title.clone(),
            description: description.clone(),
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
        };
        self.store.append(record).await?;

        Ok(description)
    }

    fn toggle_history(&mut self, surface: &mut dyn Surface) {
        self.show_history = !self.show_history;

        if !self.show_history {
            surface.show(Output::Notice(HISTORY_HIDDEN.to_string()));
        } else if self.store.is_empty() {
            surface.show(Output::Notice(EMPTY_HISTORY.to_string()));
        } else {
            surface.show(Output::History(self.store.records().to_vec()));
        }
    }

    fn ask_question(&mut self, index: usize, surface: &mut dyn Surface) {
        if self.state != State::Displayed {
            surface.show(Output::Notice(ValidationError::NothingGenerated.to_string()));
            return;
        }

        match self.questions.get(index) {
            Some(question) => surface.show(Output::Answer(placeholder_answer(question))),
            None => surface.show(Output::Notice(
                ValidationError::UnknownQuestion(index + 1).to_string(),
            )),
        }
    }
}
