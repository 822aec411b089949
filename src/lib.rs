pub mod error;
pub mod factory;
pub mod list;
pub mod location;
pub mod packet;
pub mod packets;
pub mod rtp;
pub mod vanc;

pub use error::{AncError, MalformedKind, Result};
pub use list::{AncillaryList, IpTransmitReport, VancTransmitReport, WILDCARD_DID, WILDCARD_SID};
pub use location::{DataChannel, DataLink, DataSpace, DataStream, PacketLocation};
pub use packet::{AncPacket, DataCoding, add_even_parity};
pub use packets::{AncDataType, HdrMetadata, PacketBody, Timecode};
pub use vanc::{ChannelSearch, RasterDescriptor, VancIngestOptions};
