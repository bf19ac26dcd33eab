use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::commands::common::{load_setup, parse_field_assignments};
use crate::commands::report::REPORT_COLLECTION;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{CollectionsData, RecordData, RecordDeleteData, RecordListData};
use crate::store::{Document, DocumentStore, ObjectStore, validate_collection_name};
use crate::{ClientError, ClientResult};

/// Field that holds the stored image URL of a record.
pub const IMAGE_FIELD: &str = "image_url";

const ADD_COMMAND: &str = "record add";
const LIST_COMMAND: &str = "record list";
const UPDATE_COMMAND: &str = "record update";
const DELETE_COMMAND: &str = "record delete";
const COLLECTIONS_COMMAND: &str = "record collections";

#[derive(Debug, Default)]
pub struct RecordAddOptions<'a> {
    pub fields: Vec<String>,
    pub image: Option<String>,
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct RecordUpdateOptions<'a> {
    pub fields: Vec<String>,
    pub unset: Vec<String>,
    pub image: Option<String>,
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct RecordListOptions<'a> {
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct RecordDeleteOptions<'a> {
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct RecordCollectionsOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn add(
    collection: &str,
    fields: Vec<String>,
    image: Option<String>,
) -> ClientResult<SuccessEnvelope> {
    add_with_options(
        collection,
        RecordAddOptions {
            fields,
            image,
            home_override: None,
        },
    )
}

#[doc(hidden)]
pub fn add_with_options(
    collection: &str,
    options: RecordAddOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    validate_writable_collection(collection, ADD_COMMAND)?;
    let mut fields = parse_field_assignments(&options.fields, ADD_COMMAND)?;
    if fields.is_empty() && options.image.is_none() {
        return Err(ClientError::invalid_argument_for_command(
            "Nothing to store. Pass at least one `key=value` field or `--image <path>`.",
            Some(ADD_COMMAND),
        ));
    }

    let setup = load_setup(options.home_override)?;
    let objects = ObjectStore::new(&setup.objects_dir);
    let image_url = upload_image(&objects, options.image.as_deref())?;
    if let Some(url) = &image_url {
        fields.insert(IMAGE_FIELD.to_string(), Value::String(url.clone()));
    }

    let added = DocumentStore::open(&setup).and_then(|store| store.add(collection, fields));
    match added {
        Ok(record) => success(ADD_COMMAND, RecordData { record }),
        Err(error) => {
            discard_image(&objects, image_url.as_deref());
            Err(error)
        }
    }
}

pub fn list(collection: &str) -> ClientResult<SuccessEnvelope> {
    list_with_options(
        collection,
        RecordListOptions {
            home_override: None,
        },
    )
}

#[doc(hidden)]
pub fn list_with_options(
    collection: &str,
    options: RecordListOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    validate_collection_name(collection)?;
    let setup = load_setup(options.home_override)?;
    let store = DocumentStore::open(&setup)?;
    let records = store.list(collection)?;
    success(
        LIST_COMMAND,
        RecordListData {
            collection: collection.to_string(),
            records,
        },
    )
}

pub fn update(
    collection: &str,
    record_id: &str,
    fields: Vec<String>,
    unset: Vec<String>,
    image: Option<String>,
) -> ClientResult<SuccessEnvelope> {
    update_with_options(
        collection,
        record_id,
        RecordUpdateOptions {
            fields,
            unset,
            image,
            home_override: None,
        },
    )
}

#[doc(hidden)]
pub fn update_with_options(
    collection: &str,
    record_id: &str,
    options: RecordUpdateOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    validate_writable_collection(collection, UPDATE_COMMAND)?;
    let mut set = parse_field_assignments(&options.fields, UPDATE_COMMAND)?;
    let unset = options
        .unset
        .iter()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .collect::<Vec<String>>();
    if set.is_empty() && unset.is_empty() && options.image.is_none() {
        return Err(ClientError::invalid_argument_for_command(
            "Nothing to update. Pass `key=value` fields, `--unset <key>` or `--image <path>`.",
            Some(UPDATE_COMMAND),
        ));
    }

    let setup = load_setup(options.home_override)?;
    let mut store = DocumentStore::open(&setup)?;
    let previous_image = image_url_of(&store.get(collection, record_id)?);

    let objects = ObjectStore::new(&setup.objects_dir);
    let new_image = upload_image(&objects, options.image.as_deref())?;
    if let Some(url) = &new_image {
        set.insert(IMAGE_FIELD.to_string(), Value::String(url.clone()));
    }

    let record = match store.update(collection, record_id, set, &unset) {
        Ok(record) => record,
        Err(error) => {
            discard_image(&objects, new_image.as_deref());
            return Err(error);
        }
    };

    let current_image = image_url_of(&record);
    if previous_image.is_some() && previous_image != current_image {
        discard_image(&objects, previous_image.as_deref());
    }

    success(UPDATE_COMMAND, RecordData { record })
}

pub fn delete(collection: &str, record_id: &str) -> ClientResult<SuccessEnvelope> {
    delete_with_options(
        collection,
        record_id,
        RecordDeleteOptions {
            home_override: None,
        },
    )
}

#[doc(hidden)]
pub fn delete_with_options(
    collection: &str,
    record_id: &str,
    options: RecordDeleteOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    validate_writable_collection(collection, DELETE_COMMAND)?;
    let setup = load_setup(options.home_override)?;
    let store = DocumentStore::open(&setup)?;
    let image = image_url_of(&store.get(collection, record_id)?);

    store.delete(collection, record_id)?;

    let image_removed = match image {
        Some(url) => ObjectStore::new(&setup.objects_dir).remove(&url),
        None => false,
    };

    success(
        DELETE_COMMAND,
        RecordDeleteData {
            collection: collection.to_string(),
            record_id: record_id.to_string(),
            image_removed,
        },
    )
}

pub fn collections() -> ClientResult<SuccessEnvelope> {
    collections_with_options(RecordCollectionsOptions {
        home_override: None,
    })
}

#[doc(hidden)]
pub fn collections_with_options(
    options: RecordCollectionsOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let store = DocumentStore::open(&setup)?;
    let collections = store.collections()?;
    success(COLLECTIONS_COMMAND, CollectionsData { collections })
}

/// Report files own their stored CSV object, so only `report` commands may
/// change `csv_files`.
fn validate_writable_collection(collection: &str, command: &str) -> ClientResult<()> {
    validate_collection_name(collection)?;
    if collection == REPORT_COLLECTION {
        return Err(ClientError::invalid_argument_with_recovery(
            &format!(
                "`{REPORT_COLLECTION}` is managed by report commands; `{command}` cannot change it."
            ),
            vec![
                "Run `channelboard report upload --help` to add a report.".to_string(),
                "Run `channelboard report remove <report_id>` to delete one.".to_string(),
            ],
        ));
    }
    Ok(())
}

fn upload_image(objects: &ObjectStore, image: Option<&str>) -> ClientResult<Option<String>> {
    let Some(path_value) = image else {
        return Ok(None);
    };

    let path = Path::new(path_value);
    let display_name = path
        .file_name()
        .map(|value| value.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    let stored = objects.upload(path, &display_name)?;
    Ok(Some(stored.url))
}

fn discard_image(objects: &ObjectStore, url: Option<&str>) {
    if let Some(url) = url {
        let removed = objects.remove(url);
        debug!(url, removed, "discarded record image");
    }
}

fn image_url_of(document: &Document) -> Option<String> {
    document
        .fields
        .get(IMAGE_FIELD)
        .and_then(Value::as_str)
        .map(str::to_string)
}
