//! A line based front end for the [`Controller`]
use std::{io::Write, path::PathBuf};

use anyhow::{Context as _, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _};

use crate::{
    controller::{Controller, Event, Output, Surface},
    image::ImageSource,
};

pub const BANNER: &str = "Generador de Descripciones de Imágenes de Danzas de Paucartambo";
const PROMPT: &str = "> ";

pub const HELP: &str = "\
Comandos:
  url <referencia>   usar una imagen desde una URL
  upload <ruta>      subir una imagen local (jpg, jpeg o png)
  title <texto>      título o descripción breve de la imagen
  generate           generar la descripción
  history            mostrar u ocultar el historial
  ask <n>            elegir una de las preguntas relacionadas
  help               mostrar esta ayuda
  quit               salir";

/// A parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(Event),
    Help,
    Quit,
    Empty,
    /// Anything that is not a valid command, with a message for the user
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (name, argument) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(name, argument)| (name, argument.trim()));

    match (name.to_lowercase().as_str(), argument) {
        ("", _) => Command::Empty,
        ("url", reference) => Command::Event(Event::SelectImage(ImageSource::Url(
            reference.to_string(),
        ))),
        ("upload", "") => Command::Invalid("Indique la ruta de la imagen.".to_string()),
        ("upload", path) => {
            Command::Event(Event::SelectImage(ImageSource::Upload(PathBuf::from(path))))
        }
        ("title", title) => Command::Event(Event::SetTitle(title.to_string())),
        ("generate", _) => Command::Event(Event::Generate),
        ("history", _) => Command::Event(Event::ToggleHistory),
        ("ask", number) => match number.parse::<usize>() {
            Ok(number) if number > 0 => Command::Event(Event::AskQuestion(number - 1)),
            _ => Command::Invalid(format!("Número de pregunta inválido: '{number}'")),
        },
        ("help", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        (other, _) => Command::Invalid(format!(
            "Comando desconocido: '{other}'. Escriba 'help' para ver los comandos."
        )),
    }
}

/// Renders an output as the text printed for it
pub fn render(output: &Output) -> String {
    match output {
        Output::Notice(text)
        | Output::Progress(text)
        | Output::Success(text)
        | Output::Error(text)
        | Output::Description(text)
        | Output::Answer(text) => text.clone(),
        Output::Image(reference) => format!("Imagen: {reference}"),
        Output::Questions(questions) => questions.iter().enumerate().fold(
            "Preguntas relacionadas:".to_string(),
            |mut rendered, (i, question)| {
                rendered.push_str(&format!("\n  {}. {question}", i + 1));
                rendered
            },
        ),
        Output::History(records) => records
            .iter()
            .map(|record| {
                format!(
                    "{} | {} | {}",
                    record.image, record.title, record.description
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Prints outputs to a writer, one block per output
pub struct Terminal<W: Write> {
    out: W,
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print(&mut self, text: &str) -> std::io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    fn prompt(&mut self) -> std::io::Result<()> {
        write!(self.out, "{PROMPT}")?;
        self.out.flush()
    }
}

impl<W: Write> Surface for Terminal<W> {
    fn show(&mut self, output: Output) {
        if let Err(err) = self.print(&render(&output)) {
            tracing::error!("Failed to write output: {err}");
        }
    }
}

/// Reads commands from `input` until it ends or the user quits
///
/// # Errors
///
/// Errors if reading input or writing output fails
pub async fn run<W: Write>(
    controller: &mut Controller,
    input: impl AsyncBufRead + Unpin,
    out: W,
) -> Result<W> {
    let mut terminal = Terminal::new(out);
    let mut lines = input.lines();

    terminal.print(BANNER)?;
    terminal.print(HELP)?;

    loop {
        terminal.prompt()?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match parse_command(&line) {
            Command::Event(event) => controller.handle(event, &mut terminal).await,
            Command::Help => terminal.print(HELP)?,
            Command::Quit => break,
            Command::Empty => {}
            Command::Invalid(message) => terminal.print(&message)?,
        }
    }

    Ok(terminal.into_inner())
}
