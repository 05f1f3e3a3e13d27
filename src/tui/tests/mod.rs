mod reducer_tests;
