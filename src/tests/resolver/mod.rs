mod file_tests;
