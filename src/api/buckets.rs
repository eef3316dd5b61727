use super::{flags, ApiRequest, MetagenerationMatch, MethodInfo, Verb};
use crate::{
    builder::{Arguments, FromArguments},
    model::{Bucket, Buckets, Empty, PredefinedBucketAcl, Projection},
    registry::{CommandSpec, FlagSpec},
    Result,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBucket {
    pub bucket: String,
    #[serde(flatten)]
    pub preconditions: MetagenerationMatch,
}

impl ApiRequest for DeleteBucket {
    type Response = Empty;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Delete, "b/{bucket}");
}

impl FromArguments for DeleteBucket {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket] = args.positionals()?;
        Ok(Self {
            bucket,
            preconditions: MetagenerationMatch::from_arguments(args)?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBucket {
    pub bucket: String,
    #[serde(flatten)]
    pub preconditions: MetagenerationMatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
}

impl ApiRequest for GetBucket {
    type Response = Bucket;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Get, "b/{bucket}");
}

impl FromArguments for GetBucket {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket] = args.positionals()?;
        Ok(Self {
            bucket,
            preconditions: MetagenerationMatch::from_arguments(args)?,
            projection: args.choice("projection")?,
        })
    }
}

/// Creates a new bucket in a project
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertBucket {
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<Bucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predefined_acl: Option<PredefinedBucketAcl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
}

impl ApiRequest for InsertBucket {
    type Response = Bucket;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Post, "b").body("bucket");
}

impl FromArguments for InsertBucket {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [project] = args.positionals()?;
        Ok(Self {
            project,
            bucket: args.json("bucket")?,
            predefined_acl: args.choice("predefinedAcl")?,
            projection: args.choice("projection")?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBuckets {
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
}

impl ApiRequest for ListBuckets {
    type Response = Buckets;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Get, "b");
}

impl FromArguments for ListBuckets {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [project] = args.positionals()?;
        Ok(Self {
            project,
            max_results: args.integer("maxResults")?,
            page_token: args.text("pageToken"),
            projection: args.choice("projection")?,
        })
    }
}

/// Fields shared by both ways of modifying a bucket's metadata
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyBucket {
    pub bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_resource: Option<Bucket>,
    #[serde(flatten)]
    pub preconditions: MetagenerationMatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predefined_acl: Option<PredefinedBucketAcl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
}

impl FromArguments for ModifyBucket {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [bucket] = args.positionals()?;
        Ok(Self {
            bucket,
            bucket_resource: args.json("bucketResource")?,
            preconditions: MetagenerationMatch::from_arguments(args)?,
            predefined_acl: args.choice("predefinedAcl")?,
            projection: args.choice("projection")?,
        })
    }
}

/// Updates a bucket, only the supplied fields of the resource are changed
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct PatchBucket(pub ModifyBucket);

impl ApiRequest for PatchBucket {
    type Response = Bucket;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Patch, "b/{bucket}").body("bucketResource");
}

impl FromArguments for PatchBucket {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        ModifyBucket::from_arguments(args).map(Self)
    }
}

/// Replaces a bucket's metadata
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct UpdateBucket(pub ModifyBucket);

impl ApiRequest for UpdateBucket {
    type Response = Bucket;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Put, "b/{bucket}").body("bucketResource");
}

impl FromArguments for UpdateBucket {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        ModifyBucket::from_arguments(args).map(Self)
    }
}

fn projection(help: &'static str) -> FlagSpec {
    FlagSpec::choice::<Projection>("projection", help).default_value("full")
}

fn predefined_acl() -> FlagSpec {
    FlagSpec::choice::<PredefinedBucketAcl>(
        "predefinedAcl",
        "Apply a predefined set of access controls to this bucket.",
    )
    .default_value("authenticatedRead")
}

fn modify_flags() -> Vec<FlagSpec> {
    let mut flags = vec![FlagSpec::json(
        "bucketResource",
        "A Bucket resource to be passed as the request body.",
    )];
    flags.extend(flags::if_metageneration_match(flags::Subject::Bucket));
    flags.push(predefined_acl());
    flags.push(projection("Set of properties to return. Defaults to full."));
    flags
}

pub fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new::<DeleteBucket>(
            "buckets_delete",
            "Permanently deletes an empty bucket.",
            &["bucket"],
        )
        .flags([
            FlagSpec::integer(
                "ifMetagenerationMatch",
                "If set, only deletes the bucket if its metageneration matches this value.",
            ),
            FlagSpec::integer(
                "ifMetagenerationNotMatch",
                "If set, only deletes the bucket if its metageneration does not match this value.",
            ),
        ]),
        CommandSpec::new::<GetBucket>(
            "buckets_get",
            "Returns metadata for the specified bucket.",
            &["bucket"],
        )
        .flags(flags::if_metageneration_match(flags::Subject::Bucket))
        .flags([projection("Set of properties to return. Defaults to noAcl.")]),
        CommandSpec::new::<InsertBucket>("buckets_insert", "Creates a new bucket.", &["project"])
            .flags([
                FlagSpec::json("bucket", "A Bucket resource to be passed as the request body."),
                predefined_acl(),
                projection(
                    "Set of properties to return. Defaults to noAcl, unless the bucket resource specifies acl or defaultObjectAcl properties, when it defaults to full.",
                ),
            ]),
        CommandSpec::new::<ListBuckets>(
            "buckets_list",
            "Retrieves a list of buckets for a given project.",
            &["project"],
        )
        .flags([
            FlagSpec::integer("maxResults", "Maximum number of buckets to return."),
            FlagSpec::string(
                "pageToken",
                "A previously-returned page token representing part of the larger set of results to view.",
            ),
            projection("Set of properties to return. Defaults to noAcl."),
        ]),
        CommandSpec::new::<PatchBucket>(
            "buckets_patch",
            "Updates a bucket. This method supports patch semantics.",
            &["bucket"],
        )
        .flags(modify_flags()),
        CommandSpec::new::<UpdateBucket>("buckets_update", "Updates a bucket.", &["bucket"])
            .flags(modify_flags()),
    ]
}
