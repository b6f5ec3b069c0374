mod find_by_message;
mod global_log_all_commits;
mod log_linear_history;
mod log_merge_commit;
