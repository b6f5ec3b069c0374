mod merge_conflicts;
mod merge_fast_forward;
mod merge_preconditions;
