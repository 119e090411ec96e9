use crate::client::NationStatesClient;
use crate::slug::nation_id_from_name;
use delegates_common::{DelegateList, DelegateRecord};
use scraper::{Html, Selector};
use std::fmt;
use std::time::Duration;
use tracing::{error, info};

/// Placeholder used when the API response lacks a vote element.
pub const NO_VOTE: &str = "No vote";

/// Id the ranking uses for delegates whose nation could not be resolved.
const UNKNOWN_NATION: &str = "unknown";

/// A nation's votes in the two World Assembly chambers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaVotes {
    pub general_assembly: String,
    pub security_council: String,
}

impl WaVotes {
    /// Read `<GAVOTE>` and `<SCVOTE>` out of an `api.cgi?q=wa_votes` response.
    pub fn from_xml(xml: &str) -> Self {
        let doc = Html::parse_document(xml);
        Self {
            general_assembly: element_text(&doc, "gavote"),
            security_council: element_text(&doc, "scvote"),
        }
    }
}

fn element_text(doc: &Html, tag: &str) -> String {
    Selector::parse(tag)
        .ok()
        .and_then(|sel| doc.select(&sel).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| NO_VOTE.to_string())
}

/// One delegate's voting record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    pub name: String,
    pub nation_id: String,
    pub votes: WaVotes,
}

impl fmt::Display for VoteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Region: {}, Delegate ID: {}, Vote: GA: {}, SC: {}",
            self.name, self.nation_id, self.votes.general_assembly, self.votes.security_council
        )
    }
}

/// Looks up the current votes of every delegate in a ranking, one request
/// at a time.
pub struct VoteChecker {
    client: NationStatesClient,
    pause: Duration,
}

impl VoteChecker {
    pub fn new(client: NationStatesClient, pause: Duration) -> Self {
        Self { client, pause }
    }

    /// Id to query for `delegate`, deriving one from the name when the
    /// ranking recorded it as unknown.
    pub fn nation_id_for(delegate: &DelegateRecord) -> String {
        if delegate.nation_id == UNKNOWN_NATION {
            nation_id_from_name(&delegate.name)
        } else {
            delegate.nation_id.clone()
        }
    }

    /// Query every delegate in order. Delegates whose lookup fails are
    /// logged and left out.
    pub async fn check_all(&self, delegates: &DelegateList) -> Vec<VoteRecord> {
        let mut records = Vec::with_capacity(delegates.len());
        for (i, delegate) in delegates.iter().enumerate() {
            if i > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            let nation_id = Self::nation_id_for(delegate);
            match self.client.wa_votes(&nation_id).await {
                Ok(votes) => records.push(VoteRecord {
                    name: delegate.name.clone(),
                    nation_id,
                    votes,
                }),
                Err(e) => {
                    error!(target: "votes", name = %delegate.name, %nation_id, error = %e, "vote lookup failed");
                }
            }
        }
        info!(target: "votes", checked = delegates.len(), found = records.len(), "vote lookup finished");
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_votes_are_read() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<NATION id="testlandia"><GAVOTE>FOR</GAVOTE><SCVOTE>AGAINST</SCVOTE></NATION>"#;
        let votes = WaVotes::from_xml(xml);
        assert_eq!(votes.general_assembly, "FOR");
        assert_eq!(votes.security_council, "AGAINST");
    }

    #[test]
    fn missing_elements_mean_no_vote() {
        let votes = WaVotes::from_xml(r#"<NATION id="x"><GAVOTE>FOR</GAVOTE></NATION>"#);
        assert_eq!(votes.general_assembly, "FOR");
        assert_eq!(votes.security_council, NO_VOTE);
        assert_eq!(WaVotes::from_xml("").general_assembly, NO_VOTE);
    }

    #[test]
    fn unknown_ids_fall_back_to_the_name() {
        let known = DelegateRecord::new("The Mei", "the_mei");
        let unknown = DelegateRecord::new("New Mei Republic", "unknown");
        assert_eq!(VoteChecker::nation_id_for(&known), "the_mei");
        assert_eq!(VoteChecker::nation_id_for(&unknown), "new_mei_republic");
    }

    #[test]
    fn record_line_format() {
        let record = VoteRecord {
            name: "The Mei".to_string(),
            nation_id: "the_mei".to_string(),
            votes: WaVotes {
                general_assembly: "FOR".to_string(),
                security_council: NO_VOTE.to_string(),
            },
        };
        assert_eq!(
            record.to_string(),
            "Region: The Mei, Delegate ID: the_mei, Vote: GA: FOR, SC: No vote"
        );
    }
}
