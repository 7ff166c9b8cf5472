//! End to end tests of a session: a mocked `OpenAI` endpoint, a real history file on disk and the
//! controller in between.

use pretty_assertions::assert_eq;
use retablo::{
    ExampleStore,
    controller::{Controller, Event, Output, State},
    describer::{DEFAULT_DIRECTIVE, Describer},
    image::ImageSource,
    questions::follow_up_questions,
    terminal,
};
use retablo_integrations::csv::CsvStore;
use retablo_test_utils::{mock_chat_completion, mock_chat_completion_failure, openai_client};
use temp_dir::TempDir;
use wiremock::MockServer;

const DESCRIPTION: &str =
    "Danzantes Qollas con chullos y mantas tejidas avanzan en fila por la plaza.";

async fn session(mock_server: &MockServer, history_file: &std::path::Path) -> Controller {
    let store = ExampleStore::load(CsvStore::new(history_file))
        .await
        .unwrap();
    let describer = Describer::new(openai_client(&mock_server.uri(), "gpt-4-turbo"));

    Controller::new(describer, store)
}

async fn describe(controller: &mut Controller, image: ImageSource, title: &str) -> Vec<Output> {
    let mut outputs = Vec::new();

    controller
        .handle(Event::SelectImage(image), &mut outputs)
        .await;
    controller
        .handle(Event::SetTitle(title.to_string()), &mut outputs)
        .await;
    controller.handle(Event::Generate, &mut outputs).await;

    outputs
}

async fn user_messages(mock_server: &MockServer) -> Vec<String> {
    mock_server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
            body["messages"][1]["content"].as_str().unwrap().to_string()
        })
        .collect()
}

#[test_log::test(tokio::test)]
async fn test_generated_descriptions_are_saved_and_reused_as_examples() {
    let tempdir = TempDir::new().unwrap();
    let history_file = tempdir.child("imagenes").join("nuevas_descripciones.csv");
    let mock_server = MockServer::start().await;
    mock_chat_completion(&mock_server, &format!("  {DESCRIPTION}\n")).await;

    let mut controller = session(&mock_server, &history_file).await;

    let outputs = describe(
        &mut controller,
        ImageSource::Url("https://example.com/qollas.jpg".to_string()),
        "Danza de los Qollas",
    )
    .await;

    assert_eq!(controller.state(), State::Displayed);
    assert_eq!(
        &outputs[1..],
        &[
            Output::Progress("Generando descripción...".to_string()),
            Output::Success("Descripción generada con éxito.".to_string()),
            Output::Notice("Descripción en español:".to_string()),
            Output::Description(DESCRIPTION.to_string()),
            Output::Questions(follow_up_questions(DESCRIPTION)),
        ]
    );

    let reloaded = ExampleStore::load(CsvStore::new(&history_file))
        .await
        .unwrap();
    assert_eq!(reloaded.len(), 1);
    let record = &reloaded.records()[0];
    assert_eq!(record.image, "https://example.com/qollas.jpg");
    assert_eq!(record.title, "Danza de los Qollas");
    assert_eq!(record.description, DESCRIPTION);

    describe(
        &mut controller,
        ImageSource::Url("https://example.com/saqras.jpg".to_string()),
        "Danza de los Saqras",
    )
    .await;

    let prompts = user_messages(&mock_server).await;
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].starts_with(DEFAULT_DIRECTIVE));
    assert!(prompts[0].contains("Ejemplos de descripciones previas:\n\n\n\n"));
    assert!(prompts[1].contains(&format!(
        "Título: Danza de los Qollas\nDescripción: {DESCRIPTION}\n\n"
    )));
    assert!(prompts[1].ends_with("Título: Danza de los Saqras"));

    let reloaded = ExampleStore::load(CsvStore::new(&history_file))
        .await
        .unwrap();
    let titles = reloaded
        .records()
        .iter()
        .map(|record| record.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(titles, ["Danza de los Qollas", "Danza de los Saqras"]);
}

#[test_log::test(tokio::test)]
async fn test_failed_requests_are_shown_and_not_saved() {
    let tempdir = TempDir::new().unwrap();
    let history_file = tempdir.child("nuevas_descripciones.csv");
    let mock_server = MockServer::start().await;
    mock_chat_completion_failure(&mock_server, 401, "Incorrect API key provided").await;

    let mut controller = session(&mock_server, &history_file).await;

    let outputs = describe(
        &mut controller,
        ImageSource::Url("https://example.com/qollas.jpg".to_string()),
        "Danza de los Qollas",
    )
    .await;

    assert_eq!(controller.state(), State::AwaitingInput);
    let Some(Output::Error(message)) = outputs.last() else {
        panic!("Expected an error, got {outputs:?}");
    };
    assert!(message.starts_with("Error al generar la descripción: "));
    assert!(message.contains("Incorrect API key provided"));

    assert!(!history_file.exists());
    assert!(controller.store().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_uploads_are_staged_as_png() {
    let tempdir = TempDir::new().unwrap();
    let history_file = tempdir.child("nuevas_descripciones.csv");
    let upload = tempdir.child("saqras.jpeg");
    std::fs::write(&upload, b"jpeg bytes").unwrap();
    let mock_server = MockServer::start().await;
    mock_chat_completion(&mock_server, DESCRIPTION).await;

    let mut controller = session(&mock_server, &history_file)
        .await
        .with_staging_dir(tempdir.path());

    describe(
        &mut controller,
        ImageSource::Upload(upload.clone()),
        "Danza de los Saqras",
    )
    .await;

    let staged = std::path::PathBuf::from(&controller.store().records()[0].image);
    assert_ne!(staged, upload);
    assert_eq!(staged.extension().unwrap(), "png");
    assert_eq!(std::fs::read(staged).unwrap(), b"jpeg bytes");
}

#[test_log::test(tokio::test)]
async fn test_terminal_session() {
    let tempdir = TempDir::new().unwrap();
    let history_file = tempdir.child("nuevas_descripciones.csv");
    let mock_server = MockServer::start().await;
    mock_chat_completion(&mock_server, DESCRIPTION).await;

    let mut controller = session(&mock_server, &history_file).await;
    let input = b"history\nurl https://example.com/qollas.jpg\ntitle Danza de los Qollas\ngenerate\nask 3\nhistory\nhistory\nquit\ngenerate\n";

    let out = terminal::run(&mut controller, &input[..], Vec::new())
        .await
        .unwrap();
    let printed = String::from_utf8(out).unwrap();

    assert!(printed.contains("No hay descripciones generadas aún."));
    assert!(printed.contains("Imagen: https://example.com/qollas.jpg"));
    assert!(printed.contains(&format!("Descripción en español:\n{DESCRIPTION}\n")));
    assert!(printed.contains("Preguntas relacionadas:\n  1. ¿Qué elementos destacan en"));
    assert!(printed.contains("Respuesta a: ¿Qué simbolismo tiene esta imagen?"));
    assert!(printed.contains(&format!(
        "https://example.com/qollas.jpg | Danza de los Qollas | {DESCRIPTION}"
    )));
    assert!(printed.contains("Historial oculto."));

    // Nothing after quit is handled
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}
