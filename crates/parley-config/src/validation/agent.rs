use crate::schema::ParleyConfig;

use super::helpers::validate_not_blank;

pub(super) fn validate_agent(errors: &mut Vec<String>, config: &ParleyConfig) {
    validate_not_blank(errors, "agent.name", &config.agent.name);

    if let Some(ref greeting) = config.agent.greeting {
        validate_not_blank(errors, "agent.greeting", greeting);
    }
}
