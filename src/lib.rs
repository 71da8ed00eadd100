pub mod error;
pub mod fetch;
pub mod service;

pub use service::WsdlService;
pub use soapfold_util as util;
pub use soapfold_wsdl as wsdl;
