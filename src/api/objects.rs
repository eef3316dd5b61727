use super::{flags, ApiRequest, GenerationMatch, MetagenerationMatch, MethodInfo, Verb};
use crate::{
    builder::{Arguments, FromArguments},
    model::{Channel, ComposeRequest, Empty, Object, Objects, PredefinedObjectAcl, Projection},
    registry::{CommandSpec, FlagSpec},
    Result,
};
use serde::Serialize;

/// Concatenates a list of existing objects into a new object in the same bucket
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeObject {
    pub destination_bucket: String,
    pub destination_object: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose_request: Option<ComposeRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_predefined_acl: Option<PredefinedObjectAcl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_generation_match: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_metageneration_match: Option<i64>,
}

impl ApiRequest for ComposeObject {
    type Response = Object;
    const METHOD: MethodInfo = MethodInfo::new(
        Verb::Post,
        "b/{destinationBucket}/o/{destinationObject}/compose",
    )
    .body("composeRequest");
}

impl FromArguments for ComposeObject {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [destination_bucket, destination_object] = args.positionals()?;
        Ok(Self {
            destination_bucket,
            destination_object,
            compose_request: args.json("composeRequest")?,
            destination_predefined_acl: args.choice("destinationPredefinedAcl")?,
            if_generation_match: args.integer("ifGenerationMatch")?,
            if_metageneration_match: args.integer("ifMetagenerationMatch")?,
        })
    }
}

/// Preconditions on the source of a copy
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePreconditions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_source_generation_match: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_source_generation_not_match: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_source_metageneration_match: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_source_metageneration_not_match: Option<i64>,
}

/// Copies an object to a specified location, optionally overriding its metadata
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyObject {
    pub source_bucket: String,
    pub source_object: String,
    pub destination_bucket: String,
    pub destination_object: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_predefined_acl: Option<PredefinedObjectAcl>,
    #[serde(flatten)]
    pub generation_match: GenerationMatch,
    #[serde(flatten)]
    pub metageneration_match: MetagenerationMatch,
    #[serde(flatten)]
    pub source_preconditions: SourcePreconditions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<Object>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_generation: Option<i64>,
}

impl ApiRequest for CopyObject {
    type Response = Object;
    const METHOD: MethodInfo = MethodInfo::new(
        Verb::Post,
        "b/{sourceBucket}/o/{sourceObject}/copyTo/b/{destinationBucket}/o/{destinationObject}",
    )
    .body("object");
}

impl FromArguments for CopyObject {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [source_bucket, source_object, destination_bucket, destination_object] =
            args.positionals()?;
        Ok(Self {
            source_bucket,
            source_object,
            destination_bucket,
            destination_object,
            destination_predefined_acl: args.choice("destinationPredefinedAcl")?,
            generation_match: GenerationMatch::from_arguments(args)?,
            metageneration_match: MetagenerationMatch::from_arguments(args)?,
            source_preconditions: SourcePreconditions {
                if_source_generation_match: args.integer("ifSourceGenerationMatch")?,
                if_source_generation_not_match: args.integer("ifSourceGenerationNotMatch")?,
                if_source_metageneration_match: args.integer("ifSourceMetagenerationMatch")?,
                if_source_metageneration_not_match: args
                    .integer("ifSourceMetagenerationNotMatch")?,
            },
            object: args.json("object")?,
            projection: args.choice("projection")?,
            source_generation: args.integer("sourceGeneration")?,
        })
    }
}

/// A specific object, or one of its revisions
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSelector {
    pub bucket: String,
    pub object: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<i64>,
    #[serde(flatten)]
    pub generation_match: GenerationMatch,
    #[serde(flatten)]
    pub metageneration_match: MetagenerationMatch,
}

impl FromArguments for ObjectSelector {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket, object] = args.positionals()?;
        Ok(Self {
            bucket,
            object,
            generation: args.integer("generation")?,
            generation_match: GenerationMatch::from_arguments(args)?,
            metageneration_match: MetagenerationMatch::from_arguments(args)?,
        })
    }
}

/// Deletes an object and its metadata
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct DeleteObject(pub ObjectSelector);

impl ApiRequest for DeleteObject {
    type Response = Empty;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Delete, "b/{bucket}/o/{object}");
}

impl FromArguments for DeleteObject {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        ObjectSelector::from_arguments(args).map(Self)
    }
}

/// Retrieves an object's metadata, or its data when downloading
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetObject {
    #[serde(flatten)]
    pub selector: ObjectSelector,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
}

impl ApiRequest for GetObject {
    type Response = Object;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Get, "b/{bucket}/o/{object}");
}

impl FromArguments for GetObject {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        Ok(Self {
            selector: ObjectSelector::from_arguments(args)?,
            projection: args.choice("projection")?,
        })
    }
}

/// Stores a new object and metadata
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertObject {
    pub bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,
    #[serde(flatten)]
    pub generation_match: GenerationMatch,
    #[serde(flatten)]
    pub metageneration_match: MetagenerationMatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<Object>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predefined_acl: Option<PredefinedObjectAcl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
}

impl ApiRequest for InsertObject {
    type Response = Object;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Post, "b/{bucket}/o")
        .body("object")
        .upload();
}

impl FromArguments for InsertObject {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket] = args.positionals()?;
        Ok(Self {
            bucket,
            content_encoding: args.text("contentEncoding"),
            generation_match: GenerationMatch::from_arguments(args)?,
            metageneration_match: MetagenerationMatch::from_arguments(args)?,
            name: args.text("name"),
            object: args.json("object")?,
            predefined_acl: args.choice("predefinedAcl")?,
            projection: args.choice("projection")?,
        })
    }
}

/// Criteria for listing the objects in a bucket
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versions: Option<bool>,
}

impl FromArguments for Listing {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        Ok(Self {
            delimiter: args.text("delimiter"),
            max_results: args.integer("maxResults")?,
            page_token: args.text("pageToken"),
            prefix: args.text("prefix"),
            projection: args.choice("projection")?,
            versions: args.switch("versions")?,
        })
    }
}

/// Retrieves a list of objects matching the criteria
#[derive(Debug, Serialize)]
pub struct ListObjects {
    pub bucket: String,
    #[serde(flatten)]
    pub listing: Listing,
}

impl ApiRequest for ListObjects {
    type Response = Objects;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Get, "b/{bucket}/o");
}

impl FromArguments for ListObjects {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket] = args.positionals()?;
        Ok(Self {
            bucket,
            listing: Listing::from_arguments(args)?,
        })
    }
}

/// Fields shared by both ways of modifying an object's metadata
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyObject {
    #[serde(flatten)]
    pub selector: ObjectSelector,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_resource: Option<Object>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predefined_acl: Option<PredefinedObjectAcl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
}

impl FromArguments for ModifyObject {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        Ok(Self {
            selector: ObjectSelector::from_arguments(args)?,
            object_resource: args.json("objectResource")?,
            predefined_acl: args.choice("predefinedAcl")?,
            projection: args.choice("projection")?,
        })
    }
}

/// Updates an object's metadata, only the supplied fields are changed
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct PatchObject(pub ModifyObject);

impl ApiRequest for PatchObject {
    type Response = Object;
    const METHOD: MethodInfo =
        MethodInfo::new(Verb::Patch, "b/{bucket}/o/{object}").body("objectResource");
}

impl FromArguments for PatchObject {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        ModifyObject::from_arguments(args).map(Self)
    }
}

/// Replaces an object's metadata
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct UpdateObject(pub ModifyObject);

impl ApiRequest for UpdateObject {
    type Response = Object;
    const METHOD: MethodInfo =
        MethodInfo::new(Verb::Put, "b/{bucket}/o/{object}").body("objectResource");
}

impl FromArguments for UpdateObject {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        ModifyObject::from_arguments(args).map(Self)
    }
}

/// Watches for changes on all objects in a bucket
#[derive(Debug, Serialize)]
pub struct WatchAllObjects {
    pub bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    #[serde(flatten)]
    pub listing: Listing,
}

impl ApiRequest for WatchAllObjects {
    type Response = Channel;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Post, "b/{bucket}/o/watch").body("channel");
}

impl FromArguments for WatchAllObjects {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket] = args.positionals()?;
        Ok(Self {
            bucket,
            channel: args.json("channel")?,
            listing: Listing::from_arguments(args)?,
        })
    }
}

fn projection(help: &'static str) -> FlagSpec {
    FlagSpec::choice::<Projection>("projection", help).default_value("full")
}

fn predefined_acl(name: &'static str, help: &'static str) -> FlagSpec {
    FlagSpec::choice::<PredefinedObjectAcl>(name, help).default_value("authenticatedRead")
}

fn generation() -> FlagSpec {
    FlagSpec::integer(
        "generation",
        "If present, selects a specific revision of this object (as opposed to the latest version, the default).",
    )
}

/// The generation and metageneration preconditions on an object
fn preconditions() -> impl Iterator<Item = FlagSpec> {
    flags::if_generation_match()
        .into_iter()
        .chain(flags::if_metageneration_match(flags::Subject::Object))
}

fn listing_flags() -> [FlagSpec; 6] {
    [
        FlagSpec::string(
            "delimiter",
            "Returns results in a directory-like mode. items will contain only objects whose names, aside from the prefix, do not contain delimiter. Objects whose names, aside from the prefix, contain delimiter will have their name, truncated after the delimiter, returned in prefixes. Duplicate prefixes are omitted.",
        ),
        FlagSpec::integer(
            "maxResults",
            "Maximum number of items plus prefixes to return. As duplicate prefixes are omitted, fewer total results may be returned than requested.",
        ),
        FlagSpec::string(
            "pageToken",
            "A previously-returned page token representing part of the larger set of results to view.",
        ),
        FlagSpec::string(
            "prefix",
            "Filter results to objects whose names begin with this prefix.",
        ),
        projection("Set of properties to return. Defaults to noAcl."),
        FlagSpec::boolean(
            "versions",
            "If true, lists all versions of a file as distinct results.",
        ),
    ]
}

fn modify_flags() -> Vec<FlagSpec> {
    let mut flags = vec![generation()];
    flags.extend(preconditions());
    flags.extend([
        FlagSpec::json(
            "objectResource",
            "A Object resource to be passed as the request body.",
        ),
        predefined_acl(
            "predefinedAcl",
            "Apply a predefined set of access controls to this object.",
        ),
        projection("Set of properties to return. Defaults to full."),
    ]);
    flags
}

pub fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new::<ComposeObject>(
            "objects_compose",
            "Concatenates a list of existing objects into a new object in the same bucket.",
            &["destinationBucket", "destinationObject"],
        )
        .flags([
            FlagSpec::json(
                "composeRequest",
                "A ComposeRequest resource to be passed as the request body.",
            ),
            predefined_acl(
                "destinationPredefinedAcl",
                "Apply a predefined set of access controls to the destination object.",
            ),
            FlagSpec::integer(
                "ifGenerationMatch",
                "Makes the operation conditional on whether the object's current generation matches the given value.",
            ),
            FlagSpec::integer(
                "ifMetagenerationMatch",
                "Makes the operation conditional on whether the object's current metageneration matches the given value.",
            ),
        ])
        .download(),
        CommandSpec::new::<CopyObject>(
            "objects_copy",
            "Copies an object to a specified location. Optionally overrides metadata.",
            &[
                "sourceBucket",
                "sourceObject",
                "destinationBucket",
                "destinationObject",
            ],
        )
        .flags([
            predefined_acl(
                "destinationPredefinedAcl",
                "Apply a predefined set of access controls to the destination object.",
            ),
            FlagSpec::integer(
                "ifGenerationMatch",
                "Makes the operation conditional on whether the destination object's current generation matches the given value.",
            ),
            FlagSpec::integer(
                "ifGenerationNotMatch",
                "Makes the operation conditional on whether the destination object's current generation does not match the given value.",
            ),
            FlagSpec::integer(
                "ifMetagenerationMatch",
                "Makes the operation conditional on whether the destination object's current metageneration matches the given value.",
            ),
            FlagSpec::integer(
                "ifMetagenerationNotMatch",
                "Makes the operation conditional on whether the destination object's current metageneration does not match the given value.",
            ),
            FlagSpec::integer(
                "ifSourceGenerationMatch",
                "Makes the operation conditional on whether the source object's generation matches the given value.",
            ),
            FlagSpec::integer(
                "ifSourceGenerationNotMatch",
                "Makes the operation conditional on whether the source object's generation does not match the given value.",
            ),
            FlagSpec::integer(
                "ifSourceMetagenerationMatch",
                "Makes the operation conditional on whether the source object's current metageneration matches the given value.",
            ),
            FlagSpec::integer(
                "ifSourceMetagenerationNotMatch",
                "Makes the operation conditional on whether the source object's current metageneration does not match the given value.",
            ),
            FlagSpec::json("object", "A Object resource to be passed as the request body."),
            projection(
                "Set of properties to return. Defaults to noAcl, unless the object resource specifies the acl property, when it defaults to full.",
            ),
            FlagSpec::integer(
                "sourceGeneration",
                "If present, selects a specific revision of the source object (as opposed to the latest version, the default).",
            ),
        ])
        .download(),
        CommandSpec::new::<DeleteObject>(
            "objects_delete",
            "Deletes an object and its metadata. Deletions are permanent if versioning is not enabled for the bucket, or if the generation parameter is used.",
            &["bucket", "object"],
        )
        .flags([generation()])
        .flags(preconditions()),
        CommandSpec::new::<GetObject>(
            "objects_get",
            "Retrieves an object or its metadata.",
            &["bucket", "object"],
        )
        .flags([generation()])
        .flags(preconditions())
        .flags([projection("Set of properties to return. Defaults to noAcl.")])
        .download(),
        CommandSpec::new::<InsertObject>(
            "objects_insert",
            "Stores a new object and metadata.",
            &["bucket"],
        )
        .flags([FlagSpec::string(
            "contentEncoding",
            "If set, sets the contentEncoding property of the final object to this value.",
        )])
        .flags(preconditions())
        .flags([
            FlagSpec::string(
                "name",
                "Name of the object. Required when the object metadata is not otherwise provided. Overrides the object metadata's name value, if any.",
            ),
            FlagSpec::json("object", "A Object resource to be passed as the request body."),
            predefined_acl(
                "predefinedAcl",
                "Apply a predefined set of access controls to this object.",
            ),
            projection(
                "Set of properties to return. Defaults to noAcl, unless the object resource specifies the acl property, when it defaults to full.",
            ),
        ])
        .upload(),
        CommandSpec::new::<ListObjects>(
            "objects_list",
            "Retrieves a list of objects matching the criteria.",
            &["bucket"],
        )
        .flags(listing_flags()),
        CommandSpec::new::<PatchObject>(
            "objects_patch",
            "Updates an object's metadata. This method supports patch semantics.",
            &["bucket", "object"],
        )
        .flags(modify_flags()),
        CommandSpec::new::<UpdateObject>(
            "objects_update",
            "Updates an object's metadata.",
            &["bucket", "object"],
        )
        .flags(modify_flags())
        .download(),
        CommandSpec::new::<WatchAllObjects>(
            "objects_watchAll",
            "Watch for changes on all objects in a bucket.",
            &["bucket"],
        )
        .flags([FlagSpec::json(
            "channel",
            "A Channel resource to be passed as the request body.",
        )])
        .flags(listing_flags()),
    ]
}
