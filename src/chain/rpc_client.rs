use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use crate::chain::{
    ChainDataSource, ChainError, HolderBalance, MintAccount, SignatureRecord, TokenSupply,
};
use crate::config::ChainSettings;

/// Solana JSON-RPC 2.0 client for the handful of calls the collectors need.
pub struct RpcChainClient {
    client: Client,
    endpoint: Url,
    commitment: String,
    next_id: AtomicU64,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// `{ "context": {...}, "value": ... }` wrapper used by most account RPCs.
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct UiTokenAmount {
    amount: String,
    decimals: u8,
}

#[derive(Debug, Deserialize)]
struct UiTokenAccountBalance {
    address: String,
    amount: String,
}

#[derive(Debug, Deserialize)]
struct UiAccount {
    owner: String,
    data: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UiSignatureStatus {
    signature: String,
    slot: u64,
    #[serde(default)]
    err: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParsedMintInfo {
    #[serde(default)]
    decimals: Option<u8>,
    #[serde(default)]
    is_initialized: bool,
    #[serde(default)]
    mint_authority: Option<String>,
    #[serde(default)]
    freeze_authority: Option<String>,
}

impl RpcChainClient {
    pub fn new(settings: &ChainSettings) -> Result<Self, ChainError> {
        let endpoint = settings.endpoint()?;
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| ChainError::Configuration(e.without_url().to_string()))?;

        Ok(Self {
            client,
            endpoint,
            commitment: settings.commitment.clone(),
            next_id: AtomicU64::new(1),
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, ChainError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        debug!(method = %method, id = request.id, "Sending RPC request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(method = %method, status = status.as_u16(), "RPC endpoint returned error status");
            return Err(ChainError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body: RpcResponse<T> = response.json().await.map_err(|e| ChainError::Decode {
            method: method.to_string(),
            message: e.without_url().to_string(),
        })?;

        if let Some(error) = body.error {
            return Err(ChainError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        body.result.ok_or_else(|| ChainError::MissingResult {
            method: method.to_string(),
        })
    }
}

fn parse_amount(raw: &str, what: &str) -> Result<u128, ChainError> {
    raw.parse::<u128>()
        .map_err(|_| ChainError::InvalidData(format!("{} is not an integer amount: {}", what, raw)))
}

/// Pulls the `parsed` section out of a `jsonParsed` account. Unparsed accounts
/// come back as a `[data, encoding]` array and yield `None`. A parsed mint whose
/// `info` cannot be read is an error; its authorities are unknown, not revoked.
fn parsed_account(
    data: &Value,
) -> Result<Option<(Option<String>, ParsedMintInfo)>, ChainError> {
    let Some(parsed) = data.get("parsed") else {
        return Ok(None);
    };
    let account_type = parsed
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_string);

    let info = parsed
        .get("info")
        .ok_or_else(|| account_decode_error("parsed account has no info"))?;
    if account_type.as_deref() == Some("mint") {
        for key in ["mintAuthority", "freezeAuthority"] {
            if info.get(key).is_none() {
                return Err(account_decode_error(&format!("mint info has no {}", key)));
            }
        }
    }

    let info = serde_json::from_value::<ParsedMintInfo>(info.clone())
        .map_err(|e| account_decode_error(&e.to_string()))?;
    Ok(Some((account_type, info)))
}

fn account_decode_error(message: &str) -> ChainError {
    ChainError::Decode {
        method: "getAccountInfo".to_string(),
        message: message.to_string(),
    }
}

#[async_trait]
impl ChainDataSource for RpcChainClient {
    async fn token_supply(&self, mint: &str) -> Result<TokenSupply, ChainError> {
        let supply: WithContext<UiTokenAmount> = self
            .call("getTokenSupply", json!([mint, { "commitment": self.commitment }]))
            .await?;

        Ok(TokenSupply {
            amount: parse_amount(&supply.value.amount, "supply")?,
            decimals: supply.value.decimals,
        })
    }

    async fn largest_accounts(&self, mint: &str) -> Result<Vec<HolderBalance>, ChainError> {
        let accounts: WithContext<Vec<UiTokenAccountBalance>> = self
            .call(
                "getTokenLargestAccounts",
                json!([mint, { "commitment": self.commitment }]),
            )
            .await?;

        accounts
            .value
            .into_iter()
            .map(|account| {
                Ok(HolderBalance {
                    amount: parse_amount(&account.amount, "holder balance")?,
                    address: account.address,
                })
            })
            .collect()
    }

    async fn mint_account(&self, mint: &str) -> Result<MintAccount, ChainError> {
        let account: WithContext<Option<UiAccount>> = self
            .call(
                "getAccountInfo",
                json!([mint, { "encoding": "jsonParsed", "commitment": self.commitment }]),
            )
            .await?;

        let account = account.value.ok_or_else(|| ChainError::AccountNotFound {
            address: mint.to_string(),
        })?;

        let (account_type, info) =
            parsed_account(&account.data)?.unwrap_or((None, ParsedMintInfo::default()));

        Ok(MintAccount {
            owner_program: account.owner,
            account_type,
            is_initialized: info.is_initialized,
            decimals: info.decimals,
            mint_authority: info.mint_authority,
            freeze_authority: info.freeze_authority,
        })
    }

    async fn recent_signatures(
        &self,
        mint: &str,
        limit: usize,
    ) -> Result<Vec<SignatureRecord>, ChainError> {
        let statuses: Vec<UiSignatureStatus> = self
            .call(
                "getSignaturesForAddress",
                json!([mint, { "limit": limit, "commitment": self.commitment }]),
            )
            .await?;

        Ok(statuses
            .into_iter()
            .map(|status| SignatureRecord {
                signature: status.signature,
                slot: status.slot,
                failed: status.err.map_or(false, |err| !err.is_null()),
            })
            .collect())
    }

    fn source_name(&self) -> &'static str {
        "solana_rpc"
    }
}
