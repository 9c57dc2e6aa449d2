pub mod stream_op;
