use quick_xml::events::Event;
use quick_xml::Reader;

use crate::common::errors::{Result, RestoreError};

/// Propiedades de un recurso dentro de una respuesta multistatus, como bolsa
/// de propiedades con claves conocidas. Las propiedades ausentes quedan en
/// `None` y se resuelven en el recolector, nunca por posición.
#[derive(Debug, Clone, Default)]
pub struct DavResource {
    pub href: String,
    pub original_filename: Option<String>,
    pub original_location: Option<String>,
    pub deleted_at: Option<String>,
    pub is_collection: bool,
}

enum Field {
    Href,
    OriginalFilename,
    OriginalLocation,
    DeletedAt,
}

/// Interpreta el cuerpo XML de un PROPFIND multistatus. Los nombres de
/// elemento se comparan por nombre local, ignorando el prefijo de namespace
/// que elija el servidor.
pub fn parse_multistatus(body: &str) -> Result<Vec<DavResource>> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut resources = Vec::new();
    let mut current: Option<DavResource> = None;
    let mut field: Option<Field> = None;
    let mut saw_multistatus = false;

    loop {
        match reader.read_event() {
            Err(e) => {
                return Err(
                    RestoreError::parse("Multistatus", format!("invalid XML: {e}")).with_source(e),
                )
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(element)) => match element.local_name().as_ref() {
                b"multistatus" => saw_multistatus = true,
                b"response" => current = Some(DavResource::default()),
                b"href" => field = Some(Field::Href),
                b"trashbin-original-filename" => field = Some(Field::OriginalFilename),
                b"trashbin-original-location" => field = Some(Field::OriginalLocation),
                b"trashbin-delete-datetime" => field = Some(Field::DeletedAt),
                b"collection" => mark_collection(&mut current),
                _ => {}
            },
            Ok(Event::Empty(element)) => {
                if element.local_name().as_ref() == b"collection" {
                    mark_collection(&mut current);
                }
            }
            Ok(Event::Text(text)) => {
                let value = text
                    .unescape()
                    .map_err(|e| {
                        RestoreError::parse("Multistatus", format!("invalid text node: {e}"))
                            .with_source(e)
                    })?
                    .into_owned();
                if let (Some(resource), Some(field)) = (current.as_mut(), field.as_ref()) {
                    match field {
                        Field::Href => resource.href = value,
                        Field::OriginalFilename => resource.original_filename = Some(value),
                        Field::OriginalLocation => resource.original_location = Some(value),
                        Field::DeletedAt => resource.deleted_at = Some(value),
                    }
                }
            }
            Ok(Event::End(element)) => {
                if element.local_name().as_ref() == b"response" {
                    if let Some(resource) = current.take() {
                        resources.push(resource);
                    }
                } else {
                    field = None;
                }
            }
            Ok(_) => {}
        }
    }

    if !saw_multistatus {
        return Err(RestoreError::parse(
            "Multistatus",
            "response body is not a multistatus document",
        ));
    }
    Ok(resources)
}

fn mark_collection(current: &mut Option<DavResource>) {
    if let Some(resource) = current.as_mut() {
        resource.is_collection = true;
    }
}
