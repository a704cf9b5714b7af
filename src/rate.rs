// rate.rs - Vulnerability scan throughput policy

use crate::waf::WafVerdict;

/// Nuclei rate limit used whenever any WAF is detected
pub const WAF_RATE_LIMIT: u32 = 50;

/// Any detected WAF forces the conservative rate, whatever the configured default.
pub fn select_rate(verdict: WafVerdict, configured_default: u32) -> u32 {
    if verdict.is_detected() {
        WAF_RATE_LIMIT
    } else {
        configured_default
    }
}
