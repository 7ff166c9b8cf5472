use thiserror::Error;

/// Input that keeps a description from being generated
///
/// These are shown to the user as is, hence the Spanish messages.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Proporcione una imagen antes de generar la descripción.")]
    MissingImage,

    #[error("Ingrese un título o descripción breve de la imagen antes de generar.")]
    MissingTitle,

    #[error("Formato de imagen no soportado: {0}. Use jpg, jpeg o png.")]
    UnsupportedImageType(String),

    #[error("No se pudo cargar la imagen {path}: {reason:#}")]
    UnreadableImage { path: String, reason: anyhow::Error },

    #[error("Genere una descripción antes de elegir una pregunta.")]
    NothingGenerated,

    #[error("No hay una pregunta número {0}.")]
    UnknownQuestion(usize),
}
