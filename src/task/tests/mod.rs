mod known_user_tests;
