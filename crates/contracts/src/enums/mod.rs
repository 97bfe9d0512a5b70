pub mod category;
pub mod channel;
pub mod generation_strategy;
pub mod region;
pub mod segment;

pub use category::Category;
pub use channel::Channel;
pub use generation_strategy::GenerationStrategy;
pub use region::Region;
pub use segment::Segment;
