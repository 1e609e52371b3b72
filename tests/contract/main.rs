mod common;

mod byte_image;
mod end_to_end;
mod idempotence;
mod lattice;
mod narrowing;
mod shape_non_record_varying;
mod shape_record_varying;
mod temporal_round_trip;
mod type_fixing;
