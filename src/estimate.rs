use ethers::types::{Address, Bytes, U256};

use crate::{
    abi::{ContractCall, ExecAndPay, WORD_SIZE},
    refuse,
    safe::SafeTransaction,
    utils::{hex_to_bytes, strip_hex_prefix},
};

/// Flat relay cost added on top of the data gas estimate
pub const RELAY_BASE_GAS: u64 = 32_000;

/// Margin added to the gas reported by `requiredTxGas`
pub const REQUIRED_TX_GAS_MARGIN: u64 = 10_000;

/// Hex offset of the gas figure in a `requiredTxGas` revert: the
/// `Error(string)` selector, string offset and string length words
const REVERT_GAS_OFFSET: usize = 2 * (4 + 2 * WORD_SIZE);

/// Cost table of the data gas estimator. The default matches the relay's
/// pricing; deserializing a partial table keeps the defaults for missing
/// entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataGasSchedule {
    /// Cost of a zero payload byte
    pub zero_byte: u64,
    /// Cost of any other payload byte
    pub non_zero_byte: u64,
    /// Charged once per execution
    pub fixed_overhead: u64,
    /// Charged per required signature: calldata, ecrecover and owner lookup
    pub per_signature: u64,
    /// Totals above this pay the higher surcharge
    pub refund_cliff: u64,
    /// Surcharge up to the cliff
    pub surcharge: u64,
    /// Surcharge above the cliff
    pub surcharge_above_cliff: u64,
}

impl Default for DataGasSchedule {
    fn default() -> Self {
        Self {
            zero_byte: 4,
            non_zero_byte: 68,
            fixed_overhead: 3 * 128,
            per_signature: 192 + 2176 + 2176,
            refund_cliff: 65536,
            surcharge: 64,
            surcharge_above_cliff: 128,
        }
    }
}

impl DataGasSchedule {
    /// Price `payload` for a Safe requiring `threshold` signatures
    pub fn estimate(&self, payload: &[u8], threshold: u64) -> U256 {
        let bytes = payload.iter().fold(U256::zero(), |acc, byte| {
            acc + if *byte == 0 { self.zero_byte } else { self.non_zero_byte }
        });
        let total =
            bytes + self.fixed_overhead + U256::from(threshold) * U256::from(self.per_signature);
        let surcharge = if total > U256::from(self.refund_cliff) {
            self.surcharge_above_cliff
        } else {
            self.surcharge
        };
        let estimate = total + surcharge;
        tracing::debug!(len = payload.len(), threshold, %estimate, "estimated data gas");
        estimate
    }
}

/// [`DataGasSchedule::estimate`] with the default schedule
pub fn estimate_data_gas(payload: &[u8], threshold: u64) -> U256 {
    DataGasSchedule::default().estimate(payload, threshold)
}

/// [`estimate_data_gas`] over a hex payload, with or without `0x`. The
/// bare `0x` prefix and an empty payload cost nothing.
///
/// # Errors
///
/// Odd length or a non-hex character
pub fn estimate_data_gas_hex(payload: &str, threshold: u64) -> Result<U256, hex::FromHexError> {
    Ok(estimate_data_gas(&hex_to_bytes(payload)?, threshold))
}

/// Data gas a relay charges to execute `tx` through
/// `execAndPayTransaction` with `tx_gas` forwarded at `gas_price`. The
/// payload is priced with an empty signature blob, the per signature cost
/// covers the real ones.
pub fn relay_data_gas(tx: &SafeTransaction, tx_gas: U256, gas_price: U256, threshold: u64) -> U256 {
    let payload = ContractCall::from(ExecAndPay {
        to: tx.to,
        value: tx.value,
        data: tx.data.clone(),
        operation: tx.operation,
        safe_tx_gas: tx_gas,
        data_gas: U256::zero(),
        gas_price,
        gas_token: Address::zero(),
        signatures: Bytes::default(),
    })
    .encode();
    estimate_data_gas(&payload, threshold) + RELAY_BASE_GAS
}

/// Gas figure of a `requiredTxGas` revert, plus [`REQUIRED_TX_GAS_MARGIN`].
/// `None` if the revert data is too short, not hex, or the figure leaves no
/// room for the margin.
pub fn parse_required_tx_gas(revert_data: &str) -> Option<U256> {
    let revert_data = strip_hex_prefix(revert_data);
    let word = match revert_data.get(REVERT_GAS_OFFSET..REVERT_GAS_OFFSET + 2 * WORD_SIZE) {
        Some(word) => word,
        None => refuse!(len = revert_data.len(), "revert data too short"),
    };
    let gas = match U256::from_str_radix(word, 16) {
        Ok(gas) => gas,
        Err(_) => refuse!(word, "revert data is not hex"),
    };
    match gas.checked_add(REQUIRED_TX_GAS_MARGIN.into()) {
        Some(gas) => Some(gas),
        None => refuse!(%gas, "required gas overflows with the margin"),
    }
}

/// Gas parameters for a relayed Safe execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayEstimate {
    /// Gas forwarded to the inner call
    pub safe_tx_gas: U256,
    /// Refunded overhead
    pub data_gas: U256,
    /// Refund price per gas unit
    pub gas_price: U256,
}

impl RelayEstimate {
    /// Price `tx` from the revert data of its `requiredTxGas` call
    pub fn new(
        tx: &SafeTransaction,
        required_tx_gas_revert: &str,
        gas_price: U256,
        threshold: u64,
    ) -> Option<Self> {
        let safe_tx_gas = parse_required_tx_gas(required_tx_gas_revert)?;
        let data_gas = relay_data_gas(tx, safe_tx_gas, gas_price, threshold);
        Some(Self { safe_tx_gas, data_gas, gas_price })
    }

    /// Most the relayer can be refunded: `(safeTxGas + dataGas + 32000) * gasPrice`.
    /// `None` if that does not fit in 256 bits.
    pub fn max_cost(&self) -> Option<U256> {
        self.safe_tx_gas
            .checked_add(self.data_gas)?
            .checked_add(RELAY_BASE_GAS.into())?
            .checked_mul(self.gas_price)
    }
}
