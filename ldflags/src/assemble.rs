//! Join generator values and target locations into one `-ldflags` string.

use std::collections::HashMap;

use git_meta::{MetadataResolver, MetadataSource};
use go_scanner::{GeneratorKind, Target};
use tracing::{debug, instrument};

use crate::errors::Result;

/// Produces the value for a generator kind.
pub trait ValueGenerator {
    fn generate(&self, kind: GeneratorKind) -> Result<String>;
}

impl<S: MetadataSource> ValueGenerator for MetadataResolver<S> {
    fn generate(&self, kind: GeneratorKind) -> Result<String> {
        let value = match kind {
            GeneratorKind::Version => self.version()?,
            GeneratorKind::Tag => self.tag()?,
            GeneratorKind::HashShort => self.hash_short()?,
            GeneratorKind::HashLong | GeneratorKind::Hash => self.hash_long()?,
            GeneratorKind::Time => self.time(),
        };
        Ok(value)
    }
}

/// One `-X package.variable=value` token.
pub fn flag_token(target: &Target, value: &str) -> String {
    format!(
        "-X {}.{}={}",
        target.containing_package, target.variable_name, value
    )
}

/// Build the flag string for `targets`, in order.
///
/// Each generator kind is evaluated once; targets whose value is empty are
/// left out. The first generator failure aborts the whole assembly.
#[instrument(level = "debug", skip_all, fields(targets = targets.len()))]
pub fn assemble_ldflags(targets: &[Target], values: &dyn ValueGenerator) -> Result<String> {
    let mut cache: HashMap<GeneratorKind, String> = HashMap::new();
    let mut flags = Vec::with_capacity(targets.len());

    for target in targets {
        let value = match cache.get(&target.generator) {
            Some(v) => v.clone(),
            None => {
                let v = values.generate(target.generator)?;
                cache.insert(target.generator, v.clone());
                v
            }
        };

        if value.is_empty() {
            debug!(var = %target.variable_name, generator = %target.generator, "empty value, skipped");
            continue;
        }
        flags.push(flag_token(target, &value));
    }

    Ok(flags.join(" "))
}
