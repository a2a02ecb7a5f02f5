pub mod idcodec;
