use async_trait::async_trait;

use crate::defs::CapabilityError;
use crate::defs::CapabilityHandle;
use crate::defs::CapabilityService;
use crate::defs::OperationKind;
use crate::defs::OperationOptions;

/// Stand-in for environments without an AI service.
pub struct UnsupportedCapabilityService;

#[async_trait]
impl CapabilityService for UnsupportedCapabilityService {
    fn name(&self) -> String {
        "unsupported".to_owned()
    }

    fn supports(&self, _kind: OperationKind) -> bool {
        // Nothing is available, every request goes to the heuristics.
        false
    }

    async fn create(&self, kind: OperationKind, _options: &OperationOptions) -> Result<Box<dyn CapabilityHandle>, CapabilityError> {
        Err(CapabilityError::Unavailable(kind))
    }
}
