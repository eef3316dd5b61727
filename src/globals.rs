use clap::ArgAction;

pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/storage/v1/";

/// Flags accepted by every command
#[derive(clap::Args, Clone, Debug)]
pub struct GlobalArgs {
    /// URL of the API endpoint to use
    #[arg(
        long = "api_endpoint",
        alias = "storage_url",
        env = "STORAGE_API_ENDPOINT",
        default_value = DEFAULT_ENDPOINT,
        global = true
    )]
    pub api_endpoint: url::Url,
    /// Selector specifying which fields to include in a partial response.
    #[arg(long, global = true)]
    pub fields: Option<String>,
    /// API key. Your API key identifies your project and provides you with API
    /// access, quota, and reports. Required unless you provide an OAuth 2.0 token.
    #[arg(long, env = "STORAGE_API_KEY", hide_env_values = true, global = true)]
    pub key: Option<String>,
    /// OAuth 2.0 token for the current user.
    #[arg(
        long = "oauth_token",
        env = "STORAGE_OAUTH_TOKEN",
        hide_env_values = true,
        global = true
    )]
    pub oauth_token: Option<String>,
    /// Returns response with indentations and line breaks.
    #[arg(
        long = "prettyPrint",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        global = true
    )]
    pub pretty_print: Option<bool>,
    /// Available to use for quota purposes for server-side applications. Can be
    /// any arbitrary string assigned to a user, but should not exceed 40
    /// characters. Overrides userIp if both are provided.
    #[arg(long = "quotaUser", global = true)]
    pub quota_user: Option<String>,
    /// A tracing token of the form "token:<tokenid>" or "email:<ldap>" to
    /// include in api requests.
    #[arg(long, global = true)]
    pub trace: Option<String>,
    /// IP address of the site where the request originates. Use this if you
    /// want to enforce per-user limits.
    #[arg(long = "userIp", global = true)]
    pub user_ip: Option<String>,
    /// Data format for the response.
    #[arg(long, value_parser = ["json"], global = true)]
    pub alt: Option<String>,
    /// Log requests
    #[arg(long = "log_request", global = true)]
    pub log_request: bool,
    /// Log responses
    #[arg(long = "log_response", global = true)]
    pub log_response: bool,
    /// Log requests and responses
    #[arg(long = "log_request_response", global = true)]
    pub log_request_response: bool,
    /// Increases the log level, can be specified multiple times
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl GlobalArgs {
    /// Whether any of the HTTP log flags were given
    #[inline]
    pub fn logs_http(&self) -> bool {
        self.log_request || self.log_response || self.log_request_response
    }
}

/// The parameters attached to every request of an invocation
#[derive(Clone, Debug)]
pub struct GlobalParams {
    pub endpoint: url::Url,
    pub alt: Option<String>,
    pub fields: Option<String>,
    pub key: Option<String>,
    pub oauth_token: Option<String>,
    pub pretty_print: Option<bool>,
    pub quota_user: Option<String>,
    pub trace: Option<String>,
    pub user_ip: Option<String>,
    pub log_request: bool,
    pub log_response: bool,
}

impl GlobalParams {
    /// The query parameters for every supplied global flag
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        let mut push = |name, value: Option<&String>| {
            if let Some(value) = value {
                pairs.push((name, value.clone()));
            }
        };

        push("alt", self.alt.as_ref());
        push("fields", self.fields.as_ref());
        push("key", self.key.as_ref());
        push("oauth_token", self.oauth_token.as_ref());
        push("quotaUser", self.quota_user.as_ref());
        push("trace", self.trace.as_ref());
        push("userIp", self.user_ip.as_ref());

        if let Some(pp) = self.pretty_print {
            pairs.push(("prettyPrint", pp.to_string()));
        }

        pairs
    }

    /// Whether requests will carry their own credentials, so there's no need
    /// to acquire the default ones
    #[inline]
    pub fn has_credentials(&self) -> bool {
        self.key.is_some() || self.oauth_token.is_some()
    }
}

impl From<GlobalArgs> for GlobalParams {
    fn from(ga: GlobalArgs) -> Self {
        Self {
            endpoint: ga.api_endpoint,
            alt: ga.alt,
            fields: ga.fields,
            key: ga.key,
            oauth_token: ga.oauth_token,
            pretty_print: ga.pretty_print,
            quota_user: ga.quota_user,
            trace: ga.trace,
            user_ip: ga.user_ip,
            log_request: ga.log_request || ga.log_request_response,
            log_response: ga.log_response || ga.log_request_response,
        }
    }
}

impl GlobalParams {
    /// Parameters for the specified endpoint, with nothing else supplied
    pub fn new(endpoint: url::Url) -> Self {
        Self {
            endpoint,
            alt: None,
            fields: None,
            key: None,
            oauth_token: None,
            pretty_print: None,
            quota_user: None,
            trace: None,
            user_ip: None,
            log_request: false,
            log_response: false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::{Args as _, FromArgMatches as _};

    fn parse(args: &[&str]) -> GlobalParams {
        let cmd = GlobalArgs::augment_args(clap::Command::new("test"));
        let matches = cmd.try_get_matches_from(args).unwrap();
        GlobalArgs::from_arg_matches(&matches).unwrap().into()
    }

    #[test]
    fn only_supplied_params_are_sent() {
        let gp = parse(&["test"]);
        assert!(gp.query_pairs().is_empty());
        assert_eq!(gp.endpoint.as_str(), DEFAULT_ENDPOINT);

        let gp = parse(&[
            "test",
            "--fields=items/name",
            "--prettyPrint=false",
            "--quotaUser",
            "me",
        ]);
        assert_eq!(
            gp.query_pairs(),
            vec![
                ("fields", "items/name".to_owned()),
                ("quotaUser", "me".to_owned()),
                ("prettyPrint", "false".to_owned()),
            ]
        );
    }

    #[test]
    fn alt_only_accepts_json() {
        let cmd = GlobalArgs::augment_args(clap::Command::new("test"));
        assert!(cmd.try_get_matches_from(["test", "--alt=media"]).is_err());

        assert_eq!(parse(&["test", "--alt=json"]).alt.as_deref(), Some("json"));
    }

    #[test]
    fn storage_url_alias() {
        let gp = parse(&["test", "--storage_url=http://localhost:4443/storage/v1/"]);
        assert_eq!(gp.endpoint.as_str(), "http://localhost:4443/storage/v1/");
    }

    #[test]
    fn bare_pretty_print() {
        assert_eq!(parse(&["test", "--prettyPrint"]).pretty_print, Some(true));
        assert_eq!(
            parse(&["test", "--prettyPrint=false"]).pretty_print,
            Some(false)
        );
        assert_eq!(parse(&["test"]).pretty_print, None);
    }

    #[test]
    fn log_both() {
        let gp = parse(&["test", "--log_request_response"]);
        assert!(gp.log_request && gp.log_response);
    }
}
