use super::{ApiRequest, MethodInfo, Verb};
use crate::{
    builder::{Arguments, FromArguments},
    model::{Channel, Empty},
    registry::{CommandSpec, FlagSpec},
    Result,
};
use serde::Serialize;

/// Stops watching resources through a channel
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct StopChannel(pub Channel);

impl ApiRequest for StopChannel {
    type Response = Empty;
    const METHOD: MethodInfo = MethodInfo::new(Verb::Post, "channels/stop").whole_body();
}

impl FromArguments for StopChannel {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        let [] = args.positionals()?;
        Ok(Self(Channel {
            address: args.text("address"),
            expiration: args.integer("expiration")?,
            id: args.text("id"),
            kind: args.text("kind"),
            params: args.json("params")?,
            payload: args.switch("payload")?,
            resource_id: args.text("resourceId"),
            resource_uri: args.text("resourceUri"),
            token: args.text("token"),
            r#type: args.text("type"),
        }))
    }
}

pub fn commands() -> Vec<CommandSpec> {
    vec![CommandSpec::new::<StopChannel>(
        "channels_stop",
        "Stop watching resources through this channel.",
        &[],
    )
    .flags([
        FlagSpec::string(
            "address",
            "The address where notifications are delivered for this channel.",
        ),
        FlagSpec::integer(
            "expiration",
            "Date and time of notification channel expiration, expressed as a Unix timestamp, in milliseconds. Optional.",
        ),
        FlagSpec::string(
            "id",
            "A UUID or similar unique string that identifies this channel.",
        ),
        FlagSpec::string(
            "kind",
            "Identifies this as a notification channel used to watch for changes to a resource. Value: the fixed string \"api#channel\".",
        )
        .default_value("api#channel"),
        FlagSpec::json(
            "params",
            "Additional parameters controlling delivery channel behavior. Optional.",
        ),
        FlagSpec::boolean(
            "payload",
            "A Boolean value to indicate whether payload is wanted. Optional.",
        ),
        FlagSpec::string(
            "resourceId",
            "An opaque ID that identifies the resource being watched on this channel. Stable across different API versions.",
        ),
        FlagSpec::string(
            "resourceUri",
            "A version-specific identifier for the watched resource.",
        ),
        FlagSpec::string(
            "token",
            "An arbitrary string delivered to the target address with each notification delivered over this channel. Optional.",
        ),
        FlagSpec::string(
            "type",
            "The type of delivery mechanism used for this channel.",
        ),
    ])]
}
