//! The single authoritative URL acceptance policy.
//!
//! `accept()` is a pure, total predicate: scheme + domain whitelist, query
//! trap substrings, path trap patterns, duplicate-segment detection, and the
//! file-extension blacklist. Every rejection is reported through a
//! `LogSink` with the exact reason, matching `[<host>] Motivo: <reason> -> <url>`.

use crate::logging::LogSink;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

const ALLOWED_BASE_DOMAINS: &[&str] =
    &["ics.uci.edu", "cs.uci.edu", "informatics.uci.edu", "stat.uci.edu"];

const TODAY_UCI_HOST: &str = "today.uci.edu";
const TODAY_UCI_PATH_PREFIX: &str = "/department/information_computer_sciences/";

const FORBIDDEN_QUERY_SUBSTRINGS: &[&str] = &[
    "share=", "action=login", "pwd=", "format=", "action=download", "upname=",
    "ical=", "action=edit", "replytocom=", "print=", "session=", "redirect_to=",
    "post_type=", "tribe-bar-date=", "eventDisplay=past", "do=media",
    "tab_files=", "image=", "do=diff", "difftype=",
];

const BLACKLISTED_EXTENSIONS: &str = r"(?i)\.(css|js|bmp|gif|jpe?g|ico|png|tiff?|mid|mp2|mp3|mp4|wav|avi|mov|mpeg|ram|m4v|mkv|ogg|ogv|pdf|ps|eps|tex|ppt|pptx|doc|docx|xls|xlsx|names|data|dat|exe|bz2|tar|msi|bin|7z|psd|dmg|iso|epub|dll|cnf|tgz|sha1|thmx|mso|arff|rtf|jar|csv|rm|smil|wmv|swf|wma|zip|rar|gz)$";

static RE_DAY_CALENDAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/day/(19|20)\d{2}-\d{2}-\d{2}").unwrap());
static RE_EVENT_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/events?/\d{4}-\d{2}-\d{2}").unwrap());
static RE_EVENT_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/events?/month(/\d{4}-\d{2})?/?$").unwrap());
static RE_EVENT_CATEGORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/events/category/.*/(19|20)\d{2}-\d{2}").unwrap());
static RE_GITLAB_BLOB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/-/(blob|blame|raw|commits|tree)/").unwrap());
static RE_EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(BLACKLISTED_EXTENSIONS).unwrap());

/// Decide whether `url` is eligible for crawling. Never panics: any internal
/// failure (an unparseable URL reaching this far would be unusual, since the
/// frontier already canonicalized it) is treated as a rejection.
pub fn accept(url: &str, log: &dyn LogSink) -> bool {
    match try_accept(url) {
        Ok(()) => true,
        Err(reason) => {
            let host = Url::parse(url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))
                .unwrap_or_default();
            log.rejected(&host, reason, url);
            false
        }
    }
}

/// Inner predicate returning the rejection reason on failure, so callers
/// that don't need logging (e.g. tests) can check it directly.
fn try_accept(url: &str) -> Result<(), &'static str> {
    let parsed = Url::parse(url).map_err(|_| "Invalid URL")?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err("Invalid Scheme");
    }

    let host = parsed.host_str().ok_or("Invalid Scheme")?;
    if !is_in_domain_whitelist(host, parsed.path()) {
        return Err("Out of permitted domain");
    }

    let query = parsed.query().unwrap_or("");
    if FORBIDDEN_QUERY_SUBSTRINGS.iter().any(|p| query.contains(p)) {
        return Err("Query bad parameters");
    }

    let path = parsed.path();
    if path.contains("doku.php") {
        return Err("Trap: DokuWiki URL");
    }
    if RE_DAY_CALENDAR.is_match(path) {
        return Err("Trap: specific day calendar");
    }
    if RE_EVENT_DATE.is_match(path) {
        return Err("Trap: /event(s)/ with specific date");
    }
    if RE_EVENT_MONTH.is_match(path) {
        return Err("Trap: /events/month/");
    }
    if RE_EVENT_CATEGORY.is_match(path) {
        return Err("Trap: /events/category/.../YYYY-MM");
    }
    if RE_GITLAB_BLOB.is_match(path) && path.contains("README.md") {
        return Err("Trap: GitLab redundant README views");
    }
    if path.contains("/-/commit/") {
        return Err("Trap: GitLab commit view");
    }
    if path.contains("/-/tree/") {
        return Err("Trap: GitLab tree view");
    }
    if path.contains("/epstein/pix/") || path.contains("~epstein/pix/") {
        return Err("Low-value personal photo page");
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut seen = std::collections::HashSet::with_capacity(segments.len());
    for seg in &segments {
        if !seen.insert(*seg) {
            return Err("Trap: repeated path segments");
        }
    }

    if RE_EXTENSION.is_match(&path.to_lowercase()) {
        return Err("Blacklisted file extension");
    }

    Ok(())
}

fn is_in_domain_whitelist(host: &str, path: &str) -> bool {
    if ALLOWED_BASE_DOMAINS
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{d}")))
    {
        return true;
    }
    host == TODAY_UCI_HOST && path.starts_with(TODAY_UCI_PATH_PREFIX)
}
