pub mod user_event_rto;
