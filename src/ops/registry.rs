//! The static op-id -> schema table. Field lists are recovered from
//! `original_source/beem/block_log.py`'s `operations` dict, which the
//! distilled spec's prose summarizes but does not reproduce in full (see
//! SPEC_FULL.md §4.3). Gaps at 16, 21, 22, 23, 36, 37, 38 are undefined
//! op-ids in the source and decode as `UnknownOperation`.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::OperationSchema;
use crate::codec::TypeTag::{self, *};

fn list_of(inner: TypeTag) -> TypeTag {
    List(Box::new(inner))
}

static REGISTRY: Lazy<HashMap<u8, OperationSchema>> = Lazy::new(|| {
    let mut m = HashMap::new();

    let mut def = |id: u8, name: &'static str, fields: Vec<(&'static str, TypeTag)>| {
        m.insert(id, OperationSchema { name, fields });
    };

    def(
        0,
        "vote",
        vec![
            ("voter", Str),
            ("author", Str),
            ("permlink", Str),
            ("weight", Uint16),
        ],
    );

    def(
        1,
        "comment",
        vec![
            ("parent_author", Str),
            ("parent_permlink", Str),
            ("author", Str),
            ("permlink", Str),
            ("title", Str),
            ("body", Str),
            ("json_metadata", Str),
        ],
    );

    def(
        2,
        "transfer",
        vec![
            ("from", Str),
            ("to", Str),
            ("amount", Amount),
            ("memo", Str),
        ],
    );

    def(
        3,
        "transfer_to_vesting",
        vec![("from", Str), ("to", Str), ("amount", Amount)],
    );

    def(
        4,
        "withdraw_vesting",
        vec![("account", Str), ("vesting_shares", Amount)],
    );

    def(
        5,
        "limit_order_create",
        vec![
            ("owner", Str),
            ("orderid", Uint32),
            ("amount_to_sell", Amount),
            ("min_to_receive", Amount),
            ("fill_or_kill", Bool),
            ("expiration", Timestamp),
        ],
    );

    def(
        6,
        "limit_order_cancel",
        vec![("owner", Str), ("orderid", Uint32)],
    );

    def(
        7,
        "feed_publish",
        vec![("publisher", Str), ("exchange_rate", ExchangeRate)],
    );

    def(
        8,
        "convert",
        vec![("owner", Str), ("requestid", Uint32), ("amount", Amount)],
    );

    def(
        9,
        "account_create",
        vec![
            ("fee", Amount),
            ("creator", Str),
            ("new_account_name", Str),
            ("owner", Permission),
            ("active", Permission),
            ("posting", Permission),
            ("memo_key", Pubkey),
            ("json_metadata", Str),
        ],
    );

    def(
        10,
        "account_update",
        vec![
            ("account", Str),
            ("owner", OptPermission),
            ("active", OptPermission),
            ("posting", OptPermission),
            ("memo_key", Pubkey),
            ("json_metadata", Str),
        ],
    );

    def(
        11,
        "witness_update",
        vec![
            ("owner", Str),
            ("url", Str),
            ("block_signing_key", Pubkey),
            ("props", Props),
            ("fee", Amount),
        ],
    );

    def(
        12,
        "account_witness_vote",
        vec![("account", Str), ("witness", Str), ("approve", Bool)],
    );

    def(
        13,
        "account_witness_proxy",
        vec![("account", Str), ("proxy", Str)],
    );

    // Historical PoW operation. Note this is distinct from `pow_work`
    // (spec §4.2), which is used only by `pow2` (op-id 30) below.
    def(
        14,
        "pow",
        vec![
            ("worker_account", Str),
            ("block_id", Hex20),
            ("nonce", Uint64),
            ("worker", Pubkey),
            ("input", Hex32),
            ("signature", Hex65),
            ("work", Hex32),
            ("props", Props),
        ],
    );

    def(
        15,
        "custom",
        vec![
            ("required_auths", list_of(Str)),
            ("id", Uint16),
            ("data", Hex),
        ],
    );

    // 16: report_over_production — undefined, decodes as UnknownOperation.

    def(17, "delete_comment", vec![("author", Str), ("permlink", Str)]);

    def(
        18,
        "custom_json",
        vec![
            ("required_auths", list_of(Str)),
            ("required_posting_auths", list_of(Str)),
            ("id", Str),
            ("json", Str),
        ],
    );

    def(
        19,
        "comment_options",
        vec![
            ("author", Str),
            ("permlink", Str),
            ("max_accepted_payout", Amount),
            ("percent_steem_dollars", Uint16),
            ("allow_votes", Bool),
            ("allow_curation_rewards", Bool),
            ("extensions", list_of(CommentOptionsExtension)),
        ],
    );

    def(
        20,
        "set_withdraw_vesting_route",
        vec![
            ("from_account", Str),
            ("to_account", Str),
            ("percent", Uint16),
            ("auto_vest", Bool),
        ],
    );

    // 21: limit_order_create2 — undefined.
    // 22: challenge_authority — undefined.
    // 23: prove_authority — undefined.

    def(
        24,
        "request_account_recovery",
        vec![
            ("recovery_account", Str),
            ("account_to_recover", Str),
            ("new_owner_authority", Permission),
            ("extensions", list_of(Str)),
        ],
    );

    def(
        25,
        "recover_account",
        vec![
            ("account_to_recover", Str),
            ("new_owner_authority", Permission),
            ("recent_owner_authority", Permission),
            ("extensions", list_of(Str)),
        ],
    );

    def(
        26,
        "change_recovery_account",
        vec![
            ("account_to_recover", Str),
            ("new_recovery_account", Str),
            ("extensions", list_of(Str)),
        ],
    );

    def(
        27,
        "escrow_transfer",
        vec![
            ("from", Str),
            ("to", Str),
            ("sbd_amount", Amount),
            ("steem_amount", Amount),
            ("escrow_id", Uint32),
            ("agent", Str),
            ("fee", Amount),
            ("json_metadata", Str),
            ("ratification_deadline", Timestamp),
            ("escrow_expiration", Timestamp),
        ],
    );

    def(
        28,
        "escrow_dispute",
        vec![
            ("from", Str),
            ("to", Str),
            ("who", Str),
            ("escrow_id", Uint32),
        ],
    );

    def(
        29,
        "escrow_release",
        vec![
            ("from", Str),
            ("to", Str),
            ("agent", Str),
            ("who", Str),
            ("receiver", Str),
            ("escrow_id", Uint32),
            ("sbd_amount", Amount),
            ("steem_amount", Amount),
        ],
    );

    def(
        30,
        "pow2",
        vec![
            ("work", PowWork),
            ("new_owner_key", OptPubkey),
            ("props", Props),
        ],
    );

    def(
        31,
        "escrow_approve",
        vec![
            ("from", Str),
            ("to", Str),
            ("agent", Str),
            ("who", Str),
            ("escrow_id", Uint32),
            ("approve", Bool),
        ],
    );

    def(
        32,
        "transfer_to_savings",
        vec![
            ("from", Str),
            ("to", Str),
            ("amount", Amount),
            ("memo", Str),
        ],
    );

    def(
        33,
        "transfer_from_savings",
        vec![
            ("from", Str),
            ("request_id", Uint32),
            ("to", Str),
            ("amount", Amount),
            ("memo", Str),
        ],
    );

    def(
        34,
        "cancel_transfer_from_savings",
        vec![("from", Str), ("request_id", Uint32)],
    );

    def(35, "custom_binary", vec![("id", Uint16), ("data", Hex)]);

    // 36: decline_voting_rights — undefined.
    // 37: reset_account — undefined.
    // 38: set_reset_account — undefined.

    def(
        39,
        "claim_reward_balance",
        vec![
            ("account", Str),
            ("reward_steem", Amount),
            ("reward_sbd", Amount),
            ("reward_vests", Amount),
        ],
    );

    def(
        40,
        "delegate_vesting_shares",
        vec![
            ("delegator", Str),
            ("delegatee", Str),
            ("vesting_shares", Amount),
        ],
    );

    def(
        41,
        "account_create_with_delegation",
        vec![
            ("fee", Amount),
            ("delegation", Amount),
            ("creator", Str),
            ("new_account_name", Str),
            ("owner", Permission),
            ("active", Permission),
            ("posting", Permission),
            ("memo_key", Pubkey),
            ("json_metadata", Str),
            ("extensions", list_of(Str)),
        ],
    );

    m
});

/// Looks up the schema for an op-id. Returns `None` for ids with no
/// defined schema (the gaps above, and anything outside 0..=41).
pub fn schema_for(op_id: u8) -> Option<&'static OperationSchema> {
    REGISTRY.get(&op_id)
}

/// The canonical name for an op-id, derived from the same table that
/// drives decoding — name and schema can never drift apart.
pub fn operation_name(op_id: u8) -> Option<&'static str> {
    schema_for(op_id).map(|s| s.name)
}
