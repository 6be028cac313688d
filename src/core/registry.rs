use crate::core::parsers;
use crate::domain::model::{ResponseBody, ServiceOutput};
use crate::utils::error::{Result, SocialworthError};
use url::form_urlencoded;

/// One supported share-count provider.
#[derive(Clone, Copy)]
pub struct ServiceDefinition {
    pub name: &'static str,
    pub default_enabled: bool,
    pub endpoint: fn(&str) -> String,
    pub parse: fn(&ResponseBody) -> ServiceOutput,
}

impl std::fmt::Debug for ServiceDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDefinition")
            .field("name", &self.name)
            .field("default_enabled", &self.default_enabled)
            .finish_non_exhaustive()
    }
}

impl ServiceDefinition {
    pub fn build_endpoint(&self, target_url: &str) -> String {
        (self.endpoint)(target_url)
    }

    pub fn parse_response(&self, body: &ResponseBody) -> ServiceOutput {
        (self.parse)(body)
    }
}

fn facebook_endpoint(url: &str) -> String {
    let query = format!(
        "SELECT like_count, total_count, share_count, click_count, comment_count FROM link_stat WHERE url = \"{}\"",
        url
    );
    let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("https://graph.facebook.com/fql?q={}", encoded)
}

fn pinterest_endpoint(url: &str) -> String {
    format!("http://api.pinterest.com/v1/urls/count.json?url={}", url)
}

fn twitter_endpoint(url: &str) -> String {
    format!("http://opensharecount.com/count.json?url={}", url)
}

fn linkedin_endpoint(url: &str) -> String {
    format!(
        "http://www.linkedin.com/countserv/count/share?format=json&url={}",
        url
    )
}

fn stumbleupon_endpoint(url: &str) -> String {
    format!(
        "http://www.stumbleupon.com/services/1.01/badge.getinfo?url={}",
        url
    )
}

fn reddit_endpoint(url: &str) -> String {
    format!("http://www.reddit.com/api/info.json?url={}", url)
}

fn hackernews_endpoint(url: &str) -> String {
    format!(
        "http://api.thriftdb.com/api.hnsearch.com/items/_search?q=&filter[fields][url]={}",
        url
    )
}

// Unreachable on purpose; exercises the failure path.
fn testcase_endpoint(_url: &str) -> String {
    "http://thisisbogus.supercalifragilisticexpialidocious.io".to_string()
}

static CATALOG: [ServiceDefinition; 8] = [
    ServiceDefinition {
        name: "twitter",
        default_enabled: true,
        endpoint: twitter_endpoint,
        parse: parsers::top_level_count,
    },
    ServiceDefinition {
        name: "facebook",
        default_enabled: true,
        endpoint: facebook_endpoint,
        parse: parsers::facebook,
    },
    ServiceDefinition {
        name: "pinterest",
        default_enabled: true,
        endpoint: pinterest_endpoint,
        parse: parsers::pinterest,
    },
    ServiceDefinition {
        name: "reddit",
        default_enabled: true,
        endpoint: reddit_endpoint,
        parse: parsers::reddit,
    },
    ServiceDefinition {
        name: "stumbleupon",
        default_enabled: true,
        endpoint: stumbleupon_endpoint,
        parse: parsers::stumbleupon,
    },
    ServiceDefinition {
        name: "linkedin",
        default_enabled: true,
        endpoint: linkedin_endpoint,
        parse: parsers::top_level_count,
    },
    ServiceDefinition {
        name: "hackernews",
        default_enabled: false,
        endpoint: hackernews_endpoint,
        parse: parsers::hackernews,
    },
    ServiceDefinition {
        name: "testcase",
        default_enabled: false,
        endpoint: testcase_endpoint,
        parse: parsers::passthrough,
    },
];

/// Fixed catalog of known services.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceRegistry;

impl ServiceRegistry {
    /// Case-insensitive lookup.
    pub fn resolve(name: &str) -> Result<&'static ServiceDefinition> {
        Self::lookup(name).ok_or_else(|| SocialworthError::UnknownService(name.to_lowercase()))
    }

    pub fn lookup(name: &str) -> Option<&'static ServiceDefinition> {
        let name = name.trim();
        CATALOG.iter().find(|def| def.name.eq_ignore_ascii_case(name))
    }

    pub fn contains(name: &str) -> bool {
        Self::lookup(name).is_some()
    }

    pub fn definitions() -> &'static [ServiceDefinition] {
        &CATALOG
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        CATALOG.iter().map(|def| def.name)
    }
}
