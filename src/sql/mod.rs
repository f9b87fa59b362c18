//! Record-to-SQL mapping: column names from field identifiers, literal or bound values, find-query assembly.

mod mapper;
pub mod params;
mod record;
pub mod value;
pub use mapper::*;
pub use params::*;
pub use record::*;
pub use value::*;
