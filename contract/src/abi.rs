//! Solidity interface of the voting contract.

use alloy_sol_types::sol;

sol! {
    /// Candidate record as stored on chain.
    struct CandidateEntry {
        uint256 id;
        string name;
        uint256 voteCount;
    }

    function getAllCandidates() external view returns (CandidateEntry[] memory);

    function vote(uint256 candidateId) external;
}
