mod rm_untracked_file_fails;
