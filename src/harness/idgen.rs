//! Resource-name generation for tests: deterministic when mocked,
//! collision-resistant when live.

use uuid::Uuid;

/// Hex characters of the random suffix live names carry.
const LIVE_SUFFIX_LEN: usize = 8;

/// Generates a resource name from `placeholder`, registers it in
/// `existing` and returns it.
///
/// Mocked runs derive the name from the pool size alone: placeholder
/// plus `existing.len() + 1`, advancing past any collision with a name
/// already in the pool. Re-running a test from an empty pool therefore
/// yields the same sequence, which is what lets playback line names up
/// with recorded request paths without consulting the fixture.
///
/// Live runs append a random suffix instead, so concurrent test runs
/// against a real subscription cannot trample each other's resources.
pub fn generate_id(placeholder: &str, existing: &mut Vec<String>, mocked: bool) -> String {
    if mocked {
        let mut index = existing.len() + 1;
        loop {
            let candidate = format!("{placeholder}{index}");
            if !existing.iter().any(|name| name == &candidate) {
                existing.push(candidate.clone());
                return candidate;
            }
            index += 1;
        }
    }
    loop {
        let suffix = Uuid::new_v4().simple().to_string();
        let candidate = format!("{placeholder}{}", &suffix[..LIVE_SUFFIX_LEN]);
        if !existing.iter().any(|name| name == &candidate) {
            existing.push(candidate.clone());
            return candidate;
        }
    }
}
