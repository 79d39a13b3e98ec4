//! Presentation helpers: merging display metadata into contract data and
//! formatting rows for the terminal.

use nexus_session::CandidateMeta;
use nexus_types::{short_address, Candidate, CandidateId, NetworkId, Timestamp, TransactionRecord, TxHash};
use nexus_utils::{format_ether, format_relative};

/// A candidate as shown to the user: contract data plus optional decoration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayCandidate {
    pub id: CandidateId,
    pub name: String,
    pub vote_count: u64,
    pub role: String,
    pub image: String,
    pub description: String,
}

/// Merge display metadata into a candidate. Missing metadata leaves the
/// decoration fields empty; the on-chain fields always win.
pub fn enrich(candidate: &Candidate, meta: Option<&CandidateMeta>) -> DisplayCandidate {
    let meta = meta.cloned().unwrap_or_default();
    DisplayCandidate {
        id: candidate.id,
        name: candidate.name.clone(),
        vote_count: candidate.vote_count,
        role: meta.role,
        image: meta.image,
        description: meta.description,
    }
}

/// Explorer page for a transaction.
pub fn tx_link(network: NetworkId, hash: &TxHash) -> String {
    format!("{}/tx/{}", network.explorer_url(), hash)
}

pub fn candidate_line(candidate: &DisplayCandidate) -> String {
    let mut line = format!(
        "#{}  {:<24} {:>6} votes",
        candidate.id, candidate.name, candidate.vote_count
    );
    if !candidate.role.is_empty() {
        line.push_str(&format!("  [{}]", candidate.role));
    }
    line
}

pub fn history_line(network: NetworkId, record: &TransactionRecord, now: Timestamp) -> String {
    format!(
        "{}  {:<14} from {}  {} ETH  {}",
        record.hash.short(),
        format_relative(record.timestamp, now),
        short_address(&record.from),
        format_ether(record.value),
        tx_link(network, &record.hash),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_types::{Address, U256};

    fn candidate() -> Candidate {
        Candidate {
            id: CandidateId::new(1).unwrap(),
            name: "Felix Kusuma".into(),
            vote_count: 7,
        }
    }

    #[test]
    fn enrich_merges_metadata() {
        let meta = CandidateMeta {
            role: "AI OVERLORD".into(),
            image: "https://example.org/felix.svg".into(),
            description: "Replaces lecturers with AI.".into(),
        };
        let shown = enrich(&candidate(), Some(&meta));
        assert_eq!(shown.name, "Felix Kusuma");
        assert_eq!(shown.vote_count, 7);
        assert_eq!(shown.role, "AI OVERLORD");
        assert!(candidate_line(&shown).ends_with("[AI OVERLORD]"));
    }

    #[test]
    fn enrich_without_metadata() {
        let shown = enrich(&candidate(), None);
        assert!(shown.role.is_empty());
        assert!(shown.image.is_empty());
        assert_eq!(candidate_line(&shown), "#01  Felix Kusuma                  7 votes");
    }

    #[test]
    fn explorer_links() {
        let hash = TxHash::new([0xab; 32]);
        let link = tx_link(NetworkId::Sepolia, &hash);
        assert!(link.starts_with("https://sepolia.etherscan.io/tx/0xabab"));
        assert_eq!(link.len(), "https://sepolia.etherscan.io/tx/".len() + 66);
    }

    #[test]
    fn history_row() {
        let record = TransactionRecord {
            hash: TxHash::new([0x01; 32]),
            from: Address::repeat_byte(0x11),
            to: None,
            value: U256::from(50_000_000_000_000_000u64),
            timestamp: Timestamp::new(1_000),
        };
        let line = history_line(NetworkId::Sepolia, &record, Timestamp::new(1_120));
        assert!(line.starts_with("0x01010101..."));
        assert!(line.contains("2 mins ago"));
        assert!(line.contains("0.05 ETH"));
        assert!(line.ends_with(&tx_link(NetworkId::Sepolia, &record.hash)));
    }
}
