//! Nullable ledger — an in-memory wallet provider and voting contract.
//!
//! Answers the same EIP-1193 methods a real wallet bridge would, backed by a
//! tiny model of the voting contract: candidates, per-account "has voted"
//! flags, a mempool and a block counter.

use alloy_primitives::{hex, Bytes, U256};
use alloy_sol_types::{Revert, SolCall, SolError};
use nexus_contract::abi::{getAllCandidatesCall, voteCall, CandidateEntry};
use nexus_provider::{Eip1193, ProviderError};
use nexus_types::{Address, TxHash};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Gas figure returned by `eth_estimateGas`.
const VOTE_GAS: u64 = 52_000;

struct CandidateRow {
    id: u64,
    name: String,
    votes: u64,
}

struct PendingVote {
    hash: TxHash,
    from: Address,
    candidate: u64,
}

struct MinedTx {
    block: u64,
    success: bool,
}

#[derive(Default)]
struct LedgerState {
    accounts: Vec<Address>,
    chain_id: u64,
    contract: Address,
    candidates: Vec<CandidateRow>,
    voted: HashSet<Address>,
    pending: Vec<PendingVote>,
    mined: HashMap<TxHash, MinedTx>,
    dropped: HashSet<TxHash>,
    block_number: u64,
    tx_counter: u64,
    auto_mine: bool,
    reject_connection: bool,
    reject_signatures: bool,
    drop_next: bool,
    failing_reads: u32,
    sent: Vec<TxHash>,
    requests: Vec<String>,
}

/// A deterministic wallet + ledger for testing.
///
/// Mines every transaction as soon as it is sent unless
/// [`NullLedger::manual_mining`] was called.
pub struct NullLedger {
    state: Mutex<LedgerState>,
}

impl NullLedger {
    /// A ledger exposing `account` and hosting the voting contract at `contract`.
    pub fn new(account: Address, contract: Address) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                accounts: vec![account],
                chain_id: 11_155_111,
                contract,
                auto_mine: true,
                ..Default::default()
            }),
        }
    }

    /// Convenience constructor returning the `Arc` the ledger client expects.
    pub fn shared(account: Address, contract: Address) -> Arc<Self> {
        Arc::new(Self::new(account, contract))
    }

    /// Register candidates with ids `1..=n` in the given order.
    pub fn with_candidates(self, candidates: &[(&str, u64)]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.candidates = candidates
                .iter()
                .enumerate()
                .map(|(i, (name, votes))| CandidateRow {
                    id: i as u64 + 1,
                    name: name.to_string(),
                    votes: *votes,
                })
                .collect();
        }
        self
    }

    /// Keep sent transactions in the mempool until [`NullLedger::mine_pending`].
    pub fn manual_mining(&self) {
        self.state.lock().unwrap().auto_mine = false;
    }

    /// Make the wallet refuse `eth_requestAccounts`.
    pub fn reject_connection(&self) {
        self.state.lock().unwrap().reject_connection = true;
    }

    /// Make the wallet refuse to sign transactions.
    pub fn reject_signatures(&self) {
        self.state.lock().unwrap().reject_signatures = true;
    }

    /// The next sent transaction is accepted and then vanishes from the node.
    pub fn drop_next_transaction(&self) {
        self.state.lock().unwrap().drop_next = true;
    }

    /// Fail the next `n` contract reads with a transport error.
    pub fn fail_next_reads(&self, n: u32) {
        self.state.lock().unwrap().failing_reads = n;
    }

    /// Replace the accounts the wallet exposes (account switch in the wallet).
    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.state.lock().unwrap().accounts = accounts;
    }

    /// Switch the wallet to another chain.
    pub fn set_chain_id(&self, chain_id: u64) {
        self.state.lock().unwrap().chain_id = chain_id;
    }

    /// Record a vote cast by someone else, directly on chain.
    pub fn external_vote(&self, candidate: u64) {
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.candidates.iter_mut().find(|c| c.id == candidate) {
            row.votes += 1;
        }
    }

    /// Mine every transaction in the mempool, in submission order.
    pub fn mine_pending(&self) {
        let mut state = self.state.lock().unwrap();
        mine(&mut state);
    }

    /// Current on-chain vote count for a candidate.
    pub fn votes_of(&self, candidate: u64) -> Option<u64> {
        self.state
            .lock()
            .unwrap()
            .candidates
            .iter()
            .find(|c| c.id == candidate)
            .map(|c| c.votes)
    }

    /// Hashes of every transaction accepted by `eth_sendTransaction`.
    pub fn sent_transactions(&self) -> Vec<TxHash> {
        self.state.lock().unwrap().sent.clone()
    }

    /// How many times `method` has been requested.
    pub fn request_count(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|m| *m == method)
            .count()
    }

    fn handle(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(method.to_string());

        match method {
            "eth_requestAccounts" => {
                if state.reject_connection {
                    return Err(ProviderError::UserRejected);
                }
                Ok(json!(state.accounts))
            }
            "eth_accounts" => Ok(json!(state.accounts)),
            "eth_chainId" => Ok(json!(format!("{:#x}", state.chain_id))),
            "eth_call" => {
                if state.failing_reads > 0 {
                    state.failing_reads -= 1;
                    return Err(ProviderError::Transport("connection reset".into()));
                }
                let (_, to, data) = parse_tx(&params)?;
                if to != state.contract || !data.starts_with(&getAllCandidatesCall::SELECTOR) {
                    return Err(rpc_error(-32000, "unsupported call", None));
                }
                let entries: Vec<CandidateEntry> = state
                    .candidates
                    .iter()
                    .map(|c| CandidateEntry {
                        id: U256::from(c.id),
                        name: c.name.clone(),
                        voteCount: U256::from(c.votes),
                    })
                    .collect();
                let encoded = getAllCandidatesCall::abi_encode_returns(&(entries,));
                Ok(json!(hex::encode_prefixed(encoded)))
            }
            "eth_estimateGas" => {
                let (from, to, data) = parse_tx(&params)?;
                check_vote(&state, from, to, &data)?;
                Ok(json!(format!("{VOTE_GAS:#x}")))
            }
            "eth_sendTransaction" => {
                if state.reject_signatures {
                    return Err(ProviderError::UserRejected);
                }
                let (from, to, data) = parse_tx(&params)?;
                let candidate = check_vote(&state, from, to, &data)?;

                state.tx_counter += 1;
                let mut bytes = [0u8; 32];
                bytes[24..].copy_from_slice(&state.tx_counter.to_be_bytes());
                bytes[0] = 0xee;
                let hash = TxHash::new(bytes);
                state.sent.push(hash);

                if state.drop_next {
                    state.drop_next = false;
                    state.dropped.insert(hash);
                } else {
                    state.pending.push(PendingVote {
                        hash,
                        from,
                        candidate,
                    });
                    if state.auto_mine {
                        mine(&mut state);
                    }
                }
                Ok(json!(hash))
            }
            "eth_getTransactionReceipt" => {
                let hash = parse_hash(&params)?;
                Ok(match state.mined.get(&hash) {
                    Some(tx) => json!({
                        "transactionHash": hash,
                        "blockNumber": format!("{:#x}", tx.block),
                        "gasUsed": format!("{VOTE_GAS:#x}"),
                        "status": if tx.success { "0x1" } else { "0x0" },
                    }),
                    None => Value::Null,
                })
            }
            "eth_getTransactionByHash" => {
                let hash = parse_hash(&params)?;
                let known = state.mined.contains_key(&hash)
                    || state.pending.iter().any(|p| p.hash == hash);
                Ok(if known { json!({ "hash": hash }) } else { Value::Null })
            }
            other => Err(rpc_error(-32601, &format!("method {other} not supported"), None)),
        }
    }
}

impl Eip1193 for NullLedger {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        self.handle(method, params)
    }
}

fn mine(state: &mut LedgerState) {
    let pending = std::mem::take(&mut state.pending);
    for vote in pending {
        state.block_number += 1;
        let success = !state.voted.contains(&vote.from)
            && state.candidates.iter().any(|c| c.id == vote.candidate);
        if success {
            state.voted.insert(vote.from);
            if let Some(row) = state.candidates.iter_mut().find(|c| c.id == vote.candidate) {
                row.votes += 1;
            }
        }
        let block = state.block_number;
        state.mined.insert(vote.hash, MinedTx { block, success });
    }
}

/// Validate a `vote` call against current chain state, returning the
/// candidate id or the revert the contract would raise.
fn check_vote(
    state: &LedgerState,
    from: Address,
    to: Address,
    data: &[u8],
) -> Result<u64, ProviderError> {
    if to != state.contract {
        return Err(rpc_error(-32000, "no contract at target address", None));
    }
    let call = voteCall::abi_decode(data, true)
        .map_err(|e| rpc_error(-32602, &format!("invalid calldata: {e}"), None))?;
    let candidate: u64 = call.candidateId.try_into().unwrap_or(u64::MAX);

    if state.voted.contains(&from) {
        return Err(revert("Already voted"));
    }
    if !state.candidates.iter().any(|c| c.id == candidate) {
        return Err(revert("Invalid candidate"));
    }
    Ok(candidate)
}

fn parse_tx(params: &Value) -> Result<(Address, Address, Bytes), ProviderError> {
    let tx = params
        .get(0)
        .ok_or_else(|| rpc_error(-32602, "missing transaction object", None))?;
    let field = |name: &str| {
        tx.get(name)
            .cloned()
            .ok_or_else(|| rpc_error(-32602, &format!("missing {name}"), None))
    };
    let from: Address = serde_json::from_value(field("from")?)
        .map_err(|e| rpc_error(-32602, &format!("bad from: {e}"), None))?;
    let to: Address = serde_json::from_value(field("to")?)
        .map_err(|e| rpc_error(-32602, &format!("bad to: {e}"), None))?;
    let data: Bytes = serde_json::from_value(field("data")?)
        .map_err(|e| rpc_error(-32602, &format!("bad data: {e}"), None))?;
    Ok((from, to, data))
}

fn parse_hash(params: &Value) -> Result<TxHash, ProviderError> {
    params
        .get(0)
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .ok_or_else(|| rpc_error(-32602, "missing transaction hash", None))
}

fn revert(reason: &str) -> ProviderError {
    let data = Revert {
        reason: reason.to_string(),
    }
    .abi_encode();
    rpc_error(
        3,
        &format!("execution reverted: {reason}"),
        Some(hex::encode_prefixed(data)),
    )
}

fn rpc_error(code: i64, message: &str, data: Option<String>) -> ProviderError {
    ProviderError::Rpc {
        code,
        message: message.to_string(),
        data,
    }
}
